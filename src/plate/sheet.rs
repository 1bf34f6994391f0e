//! The sheet aggregate and pipeline driver.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::constants::{DMZ, U1};
use crate::geometry::{Path, Point};
use crate::models::case::{CLOSED_LAYER, OPEN_LAYER};
use crate::models::{
    layer_display_name, Case, CustomPolygon, Key, Layer, PlateDetails, RunResult, StabType,
    SwitchType,
};
use crate::parser;

use super::keys::Cluster;
use super::{case as case_geom, finalize, keys};

/// Axis-aligned extent of everything drawn so far.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Grows the bounds to cover every vertex of `path`.
    pub fn extend_path(&mut self, path: &Path) {
        for point in path.iter() {
            if point.x < self.x_min {
                self.x_min = point.x;
            }
            if point.x > self.x_max {
                self.x_max = point.x;
            }
            if point.y < self.y_min {
                self.y_min = point.y;
            }
            if point.y > self.y_max {
                self.y_max = point.y;
            }
        }
    }
}

/// The whole drawing: configuration, parsed layout, accumulated layers and
/// result metadata. Deserializes directly from the JSON configuration
/// document; everything else is filled in by [`Sheet::generate`].
///
/// All lengths are millimetres. The stored working kerf is half the user
/// kerf because paths centre on the cut.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Sheet {
    /// Output filename stem, set by the caller.
    #[serde(skip)]
    pub hash: String,
    /// Unit of measure for exported drawings.
    #[serde(skip)]
    pub unit: String,
    /// One key unit in mm.
    #[serde(rename = "key-unit")]
    pub u1: f64,
    /// Blank margin around the drawing in mm.
    #[serde(skip)]
    pub dmz: f64,
    /// Drawing width, computed from accumulated bounds plus padding.
    #[serde(skip)]
    pub width: f64,
    /// Drawing height, computed from accumulated bounds plus padding.
    #[serde(skip)]
    pub height: f64,
    #[serde(skip)]
    pub layout_center: Point,
    #[serde(skip)]
    pub case_center: Point,
    /// Corner radius of the outer plate outline.
    pub fillet: f64,
    /// User kerf as configured.
    pub kerf: f64,
    /// Working kerf: half the user kerf, applied from the cut centreline.
    #[serde(skip)]
    pub kerf_half: f64,
    #[serde(rename = "top-padding")]
    pub top_pad: f64,
    #[serde(rename = "left-padding")]
    pub left_pad: f64,
    #[serde(rename = "right-padding")]
    pub right_pad: f64,
    #[serde(rename = "bottom-padding")]
    pub bottom_pad: f64,
    /// Extra switch-opening growth on the x axis, as configured.
    pub grow_x: f64,
    /// Extra switch-opening growth on the y axis, as configured.
    pub grow_y: f64,
    /// Working growth values the switch templates add per side.
    #[serde(skip)]
    pub grow_half: Point,
    /// Default switch template for keys that do not override it.
    #[serde(rename = "switch-type")]
    pub switch_type: SwitchType,
    /// Default stabilizer template for keys that do not override it.
    #[serde(rename = "stab-type")]
    pub stab_type: StabType,
    /// Bridges Cherry-family stab pockets with a blanked-out middle band.
    #[serde(rename = "connected-stabs")]
    pub connected_stabs: bool,
    pub case: Case,
    #[serde(rename = "custom")]
    pub custom_polygons: Vec<CustomPolygon>,
    /// The raw heterogeneous layout list, consumed by the parser.
    #[serde(rename = "layout")]
    pub raw_layout: Vec<Value>,
    /// The parsed `rows × keys` matrix.
    #[serde(skip)]
    pub layout: Vec<Vec<Key>>,
    #[serde(rename = "line-color")]
    pub line_color: String,
    #[serde(rename = "line-weight")]
    pub line_weight: f64,
    #[serde(skip)]
    pub layers: BTreeMap<String, Layer>,
    #[serde(skip)]
    pub result: RunResult,
    #[serde(skip)]
    pub bounds: Bounds,
}

impl Default for Sheet {
    fn default() -> Self {
        Self {
            hash: String::new(),
            unit: "mm".to_string(),
            u1: U1,
            dmz: DMZ,
            width: 0.0,
            height: 0.0,
            layout_center: Point::default(),
            case_center: Point::default(),
            fillet: 0.0,
            kerf: 0.0,
            kerf_half: 0.0,
            top_pad: 0.0,
            left_pad: 0.0,
            right_pad: 0.0,
            bottom_pad: 0.0,
            grow_x: 0.0,
            grow_y: 0.0,
            grow_half: Point::default(),
            switch_type: SwitchType::MxH,
            stab_type: StabType::CherryCostar,
            connected_stabs: false,
            case: Case::default(),
            custom_polygons: Vec::new(),
            raw_layout: Vec::new(),
            layout: Vec::new(),
            line_color: "black".to_string(),
            line_weight: 0.05,
            layers: BTreeMap::new(),
            result: RunResult::default(),
            bounds: Bounds::default(),
        }
    }
}

impl Sheet {
    /// Deserializes a sheet from the JSON configuration document.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or fields of the wrong type.
    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).context("failed to parse sheet configuration")
    }

    /// Runs the whole pipeline: parse the layout, place keys, emit case
    /// holes, compose the boolean geometry and normalise the final
    /// coordinates. Afterwards every layer's `keep_polys` describes the
    /// retained material and the result metadata is complete.
    ///
    /// # Errors
    ///
    /// Fails on layout parse errors. Geometry failures degrade per layer
    /// (the layer is flagged errored) so a partial preview still comes out.
    pub fn generate(&mut self) -> Result<()> {
        self.kerf_half = self.kerf / 2.0;
        self.grow_half = Point::new(self.grow_x, self.grow_y);
        self.init_layers();
        self.init_case_edges();
        parser::parse_layout(self).context("failed to parse layout")?;
        self.draw_layout();
        self.update_dimensions();
        case_geom::draw_holes(self);
        finalize::finalize_polygons(self);
        self.finalize_dimensions();
        Ok(())
    }

    /// Creates the plates this case style needs, with their result slots.
    pub(crate) fn init_layers(&mut self) {
        for layer in self.case.case_type.plates() {
            self.result.plates.push((*layer).to_string());
            self.result.details.insert(
                (*layer).to_string(),
                PlateDetails {
                    name: layer_display_name(layer),
                    ..PlateDetails::default()
                },
            );
            self.layers.insert((*layer).to_string(), Layer::default());
        }
    }

    /// Computes the effective per-edge widths: each padding clamped down to
    /// the configured edge width when one is set.
    pub(crate) fn init_case_edges(&mut self) {
        self.case.left_width = self.left_pad;
        self.case.right_width = self.right_pad;
        self.case.top_width = self.top_pad;
        self.case.bottom_width = self.bottom_pad;
        if self.case.edge_width != 0.0 {
            if self.left_pad > self.case.edge_width {
                self.case.left_width = self.case.edge_width;
            }
            if self.right_pad > self.case.edge_width {
                self.case.right_width = self.case.edge_width;
            }
            if self.top_pad > self.case.edge_width {
                self.case.top_width = self.case.edge_width;
            }
            if self.bottom_pad > self.case.edge_width {
                self.case.bottom_width = self.case.edge_width;
            }
        }
    }

    /// Walks the parsed layout, maintaining the running placement cursor and
    /// cluster context, and emits every key's geometry.
    pub(crate) fn draw_layout(&mut self) {
        let layout = std::mem::take(&mut self.layout);
        let mut prev_width = 0.0;
        let mut prev_y_off = 0.0;
        let mut cluster = Cluster::default();
        let mut p = Point::new(
            self.dmz + self.kerf_half + self.left_pad,
            self.dmz + self.kerf_half + self.top_pad,
        );
        // Seed the bounds at the cursor origin so an empty layout still
        // yields a drawing of the paddings; the first key re-seeds them.
        self.bounds = Bounds {
            x_min: p.x,
            x_max: p.x,
            y_min: p.y,
            y_max: p.y,
        };
        for (ri, row) in layout.iter().enumerate() {
            for (ki, key) in row.iter().enumerate() {
                // Cluster context latches once set non-zero and persists
                // across rows until overwritten.
                if key.rotate_cluster != 0.0 {
                    cluster.rotate = Some(key.rotate_cluster);
                }
                if key.x_abs != 0.0 {
                    cluster.x_abs = Some(key.x_abs);
                }
                if key.y_abs != 0.0 {
                    cluster.y_abs = Some(key.y_abs);
                }
                if ri == 0 && ki == 0 {
                    p.x += key.x_rel * self.u1 + key.width * self.u1 / 2.0;
                    p.y += key.y_rel * self.u1 + self.u1 / 2.0;
                    if cluster.is_positioned() {
                        p.x += cluster.x_abs_units() * self.u1;
                        p.y += cluster.y_abs_units() * self.u1;
                    }
                } else if ki == 0 {
                    p.x = self.dmz
                        + self.left_pad
                        + self.kerf_half
                        + key.x_rel * self.u1
                        + key.width * self.u1 / 2.0;
                    if key.x_abs != 0.0 || key.y_abs != 0.0 {
                        // The first row of a cluster restarts from the
                        // cluster's absolute origin.
                        p.x += cluster.x_abs_units() * self.u1;
                        p.y = self.dmz
                            + self.top_pad
                            + self.kerf_half
                            + cluster.y_abs_units() * self.u1
                            + key.y_rel * self.u1
                            + self.u1 / 2.0;
                    } else if cluster.is_positioned() {
                        p.x += cluster.x_abs_units() * self.u1;
                        p.y += key.y_rel * self.u1 + self.u1;
                    } else {
                        p.y += key.y_rel * self.u1 + self.u1;
                    }
                } else {
                    p.x += prev_width * self.u1 / 2.0
                        + key.x_rel * self.u1
                        + key.width * self.u1 / 2.0;
                }
                // Tall keys shift only their own centreline; undo the shift
                // before the next key.
                if prev_y_off != 0.0 {
                    p.y -= prev_y_off;
                    prev_y_off = 0.0;
                }
                if key.height > 1.0 {
                    prev_y_off = key.height * self.u1 / 2.0 - self.u1 / 2.0;
                    p.y += prev_y_off;
                }
                keys::draw_key(self, key, p, &cluster, ri == 0 && ki == 0);
                prev_width = key.width;
            }
        }
        self.layout = layout;
    }

    /// Extends the running bounds with `path`; with `init` the bounds are
    /// seeded from the path's first vertex so the very first key defines
    /// them outright.
    pub(crate) fn update_bounds(&mut self, path: &Path, init: bool) {
        if init {
            if let Some(first) = path.iter().next() {
                self.bounds = Bounds {
                    x_min: first.x,
                    x_max: first.x,
                    y_min: first.y,
                    y_max: first.y,
                };
            }
        }
        let mut bounds = self.bounds;
        bounds.extend_path(path);
        self.bounds = bounds;
    }

    /// Appends a cut polygon to a layer; layers the case style does not
    /// produce are ignored.
    pub(crate) fn push_cut(&mut self, layer: &str, path: Path) {
        if let Some(layer) = self.layers.get_mut(layer) {
            layer.cut_polys.push(path);
        }
    }

    /// Derives the drawing dimensions and centres from the accumulated
    /// bounds, then mirrors them into the per-plate result details.
    fn update_dimensions(&mut self) {
        self.width = self.bounds.x_max + self.right_pad + self.kerf_half - self.dmz;
        self.height = self.bounds.y_max + self.bottom_pad + self.kerf_half - self.dmz;
        self.case_center = Point::new(self.dmz + self.width / 2.0, self.dmz + self.height / 2.0);
        self.layout_center = Point::new(
            (self.bounds.x_max - self.bounds.x_min) / 2.0 + self.bounds.x_min,
            (self.bounds.y_max - self.bounds.y_min) / 2.0 + self.bounds.y_min,
        );

        let plates = self.result.plates.clone();
        for layer in &plates {
            let split_layer = layer == OPEN_LAYER || layer == CLOSED_LAYER;
            let (width, height) = if split_layer && self.top_pad < 0.0 && self.bottom_pad < 0.0 {
                // Negative vertical paddings collapse the frame into two
                // side rails, reported laid out 10 mm apart.
                let width = if self.case.edge_width > 0.0 {
                    2.0 * self.case.edge_width + 4.0 * self.kerf_half + 10.0
                } else {
                    self.left_pad + self.right_pad + 4.0 * self.kerf_half + 10.0
                };
                (width, self.height)
            } else if split_layer && self.left_pad < 0.0 && self.right_pad < 0.0 {
                let height = if self.case.edge_width > 0.0 {
                    2.0 * self.case.edge_width + 4.0 * self.kerf_half + 10.0
                } else {
                    self.top_pad + self.bottom_pad + 4.0 * self.kerf_half + 10.0
                };
                (self.width, height)
            } else {
                (self.width, self.height)
            };
            if let Some(details) = self.result.details.get_mut(layer) {
                details.width = width;
                details.height = height;
            }
        }
    }

    /// Recomputes bounds over the final keep polygons and translates every
    /// keep polygon so the drawing sits in positive coordinates at the
    /// margin; dimensions and centres follow.
    fn finalize_dimensions(&mut self) {
        let plates = self.result.plates.clone();
        let mut bounds = self.bounds;
        for layer in &plates {
            if let Some(layer) = self.layers.get(layer.as_str()) {
                for path in &layer.keep_polys {
                    bounds.extend_path(path);
                }
            }
        }
        self.bounds = bounds;

        let mut offset = Point::default();
        if self.bounds.x_min - self.dmz < 0.0 {
            offset.x = -(self.bounds.x_min - self.dmz);
        }
        if self.bounds.y_min - self.dmz < 0.0 {
            offset.y = -(self.bounds.y_min - self.dmz);
        }

        self.width = self.bounds.x_max - self.bounds.x_min;
        self.height = self.bounds.y_max - self.bounds.y_min;
        self.case_center.x += offset.x;
        self.case_center.y += offset.y;
        self.layout_center.x += offset.x;
        self.layout_center.y += offset.y;

        for layer in &plates {
            if let Some(entry) = self.layers.get_mut(layer.as_str()) {
                for path in &mut entry.keep_polys {
                    path.translate(offset);
                }
            }
            let split_layer = layer == OPEN_LAYER || layer == CLOSED_LAYER;
            if let Some(details) = self.result.details.get_mut(layer) {
                if split_layer && self.top_pad < 0.0 && self.bottom_pad < 0.0 {
                    details.height = self.height;
                } else if split_layer && self.left_pad < 0.0 && self.right_pad < 0.0 {
                    details.width = self.width;
                } else {
                    details.width = self.width;
                    details.height = self.height;
                }
            }
        }
    }
}
