//! Per-key cutout emission: keycap bounding path, switch opening and
//! stabilizer openings.
//!
//! Switch and stab templates are authored around the origin and pushed
//! through the shared placement pipeline: 90° for vertical keys, the key's
//! own rotation, translation to the placement cursor, then the cluster
//! rotation about the cluster's absolute origin.

use crate::constants::OVERLAP;
use crate::geometry::{Path, Point};
use crate::models::case::{SWITCH_LAYER, TOP_LAYER};
use crate::models::{
    alps_stab_offset, cherry_stab_offset, kailh_choc_stab_offset, CaseType, Key, StabType,
    SwitchType,
};

use super::sheet::Sheet;

/// Rotated-cluster context. Each value latches the first time a key sets it
/// non-zero and persists across rows until overwritten.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Cluster {
    pub rotate: Option<f64>,
    pub x_abs: Option<f64>,
    pub y_abs: Option<f64>,
}

impl Cluster {
    pub fn is_positioned(&self) -> bool {
        self.x_abs.is_some() || self.y_abs.is_some()
    }

    pub fn x_abs_units(&self) -> f64 {
        self.x_abs.unwrap_or(0.0)
    }

    pub fn y_abs_units(&self) -> f64 {
        self.y_abs.unwrap_or(0.0)
    }

    /// The pivot every cluster rotation turns about.
    fn pivot(&self, sheet: &Sheet) -> Point {
        Point::new(
            self.x_abs_units() * sheet.u1 + sheet.dmz + sheet.left_pad,
            self.y_abs_units() * sheet.u1 + sheet.dmz + sheet.top_pad,
        )
    }
}

/// Emits one key's geometry at `center`: updates the sheet bounds with the
/// keycap bounding path, registers custom polygon anchors, and appends the
/// switch and stabilizer cut polygons.
pub(crate) fn draw_key(sheet: &mut Sheet, key: &Key, center: Point, cluster: &Cluster, init: bool) {
    let switch = SwitchType::from_code(key.switch).unwrap_or(sheet.switch_type);
    let stab = StabType::from_code(key.stab).unwrap_or(sheet.stab_type);
    let kerf = if key.kerf != 0.0 {
        key.kerf / 2.0
    } else {
        sheet.kerf_half
    };

    register_custom_anchors(sheet, key, center);

    let vertical = key.height > key.width;
    let pivot = cluster.pivot(sheet);

    // Keycap bounding path: the cap extent (or the alternate extent when
    // larger), inflated by the overlap on every edge.
    let mut b = center;
    let mut x_point = sheet.u1 * key.width / 2.0;
    let mut y_point = sheet.u1 * key.height / 2.0;
    if key.alt_width > key.width {
        x_point = sheet.u1 * key.alt_width / 2.0;
        b.x += sheet.u1 * (key.alt_width - key.width) / 2.0;
    }
    if key.alt_height > key.height {
        y_point = sheet.u1 * key.alt_height / 2.0;
    }
    let mut bound = Path::from(vec![
        (x_point + OVERLAP, -y_point - OVERLAP),
        (x_point + OVERLAP, y_point + OVERLAP),
        (-x_point - OVERLAP, y_point + OVERLAP),
        (-x_point - OVERLAP, -y_point - OVERLAP),
    ]);
    if key.x_alt != 0.0 {
        b.x += sheet.u1 * key.x_alt;
    }
    bound.translate(b);
    if key.rotate != 0.0 {
        bound.rotate(key.rotate, b);
    }
    if let Some(r) = cluster.rotate {
        bound.rotate(r, pivot);
    }
    sheet.update_bounds(&bound, init);
    // The top plate of a sandwich case shows the caps, so their bounds are
    // its cutouts.
    if sheet.case.case_type == CaseType::Sandwich {
        sheet.push_cut(TOP_LAYER, bound);
    }

    // Switch opening.
    let mut switch_path = switch_template(switch, kerf, sheet.grow_half);
    if vertical {
        switch_path.rotate(90.0, Point::default());
    }
    if key.rotate != 0.0 {
        switch_path.rotate(key.rotate, Point::default());
    }
    switch_path.translate(center);
    if let Some(r) = cluster.rotate {
        switch_path.rotate(r, pivot);
    }

    // Stabilizers flip upside down inside positively rotated clusters so the
    // wire ends up on the far side.
    let flip_stab = cluster.rotate.unwrap_or(0.0) > 0.0
        && (key.width >= 2.0 || (vertical && key.height >= 2.0));
    let size = if vertical { key.height } else { key.width };
    let stab_paths = stab_templates(stab, size, kerf, sheet.connected_stabs);
    place_stabs(sheet, stab_paths, key, center, cluster, pivot, vertical, flip_stab);

    if key.width == 6.0 || (vertical && key.height == 6.0) {
        // Legacy 6u convention: the stem sits half a unit right of centre.
        switch_path.translate(Point::new(sheet.u1 / 2.0, 0.0));
    }
    sheet.push_cut(SWITCH_LAYER, switch_path);
}

/// Records this key's centre as an absolute anchor on every custom polygon
/// its `_c` list points at. Bad indices are skipped.
fn register_custom_anchors(sheet: &mut Sheet, key: &Key, center: Point) {
    if key.custom.is_empty() {
        return;
    }
    let custom = key.custom.replace(' ', "");
    for part in custom.split(',') {
        if let Ok(index) = part.parse::<usize>() {
            if let Some(cp) = sheet.custom_polygons.get_mut(index) {
                cp.rel_abs.push(center);
            }
        }
    }
}

/// The switch opening for one template, kerf-inset, centred at the origin.
fn switch_template(switch: SwitchType, k: f64, grow: Point) -> Path {
    match switch {
        // Plain square, optionally grown per axis.
        SwitchType::Mx => Path::from(vec![
            (7.0 - k + grow.x, -7.0 + k - grow.y),
            (7.0 - k + grow.x, 7.0 - k + grow.y),
            (-7.0 + k - grow.x, 7.0 - k + grow.y),
            (-7.0 + k - grow.x, -7.0 + k - grow.y),
        ]),
        // MX square with the Alps-compatible skirt tabs.
        SwitchType::MxAlps => Path::from(vec![
            (7.0 - k, -7.0 + k),
            (7.0 - k, -6.4 + k),
            (7.8 - k, -6.4 + k),
            (7.8 - k, 6.4 - k),
            (7.0 - k, 6.4 - k),
            (7.0 - k, 7.0 - k),
            (-7.0 + k, 7.0 - k),
            (-7.0 + k, 6.4 - k),
            (-7.8 + k, 6.4 - k),
            (-7.8 + k, -6.4 + k),
            (-7.0 + k, -6.4 + k),
            (-7.0 + k, -7.0 + k),
        ]),
        // MX with clip-relief side wings.
        SwitchType::MxH => Path::from(vec![
            (7.0 - k, -7.0 + k),
            (7.0 - k, -6.0 + k),
            (7.8 - k, -6.0 + k),
            (7.8 - k, -2.9 - k),
            (7.0 - k, -2.9 - k),
            (7.0 - k, 2.9 + k),
            (7.8 - k, 2.9 + k),
            (7.8 - k, 6.0 - k),
            (7.0 - k, 6.0 - k),
            (7.0 - k, 7.0 - k),
            (-7.0 + k, 7.0 - k),
            (-7.0 + k, 6.0 - k),
            (-7.8 + k, 6.0 - k),
            (-7.8 + k, 2.9 + k),
            (-7.0 + k, 2.9 + k),
            (-7.0 + k, -2.9 - k),
            (-7.8 + k, -2.9 - k),
            (-7.8 + k, -6.0 + k),
            (-7.0 + k, -6.0 + k),
            (-7.0 + k, -7.0 + k),
        ]),
        // Alps SKCM/SKCL rectangle.
        SwitchType::Alps => Path::from(vec![
            (7.8 - k, -6.4 + k),
            (7.8 - k, 6.4 - k),
            (-7.8 + k, 6.4 - k),
            (-7.8 + k, -6.4 + k),
        ]),
    }
}

/// The stabilizer openings for one template at the key's size, centred at
/// the origin. Unknown sizes come back empty; Alps falls back to Costar
/// geometry.
fn stab_templates(stab: StabType, size: f64, k: f64, connected: bool) -> Vec<Path> {
    match stab {
        StabType::Remove => Vec::new(),
        StabType::CherryCostar => cherry_family(size, k, connected, true),
        StabType::Cherry => cherry_family(size, k, connected, false),
        StabType::Costar => costar_slots(size, k),
        StabType::Alps => alps_slots(size, k),
        StabType::KailhChoc => kailh_choc_pockets(size, k),
    }
}

/// Mirrors a template across the y axis.
fn mirror_x(path: &Path) -> Path {
    Path(path.iter().map(|p| Point::new(-p.x, p.y)).collect())
}

/// The two Cherry pockets, with the Costar wire slot when `costar_wire`.
/// With `connected` a blanked-out band bridges the pockets so the middle of
/// the plate falls away as one piece.
fn cherry_family(size: f64, k: f64, connected: bool, costar_wire: bool) -> Vec<Path> {
    let Some(s) = cherry_stab_offset(size) else {
        return Vec::new();
    };
    let right = if costar_wire {
        Path::from(vec![
            (s - 3.375 + k, -5.53 + k),
            (s - 1.65 + k, -5.53 + k),
            (s - 1.65 + k, -6.45 + k),
            (s + 1.65 - k, -6.45 + k),
            (s + 1.65 - k, -5.53 + k),
            (s + 3.375 - k, -5.53 + k),
            (s + 3.375 - k, 6.77 - k),
            (s + 1.65 - k, 6.77 - k),
            (s + 1.65 - k, 7.75 - k),
            (s - 1.65 + k, 7.75 - k),
            (s - 1.65 + k, 6.77 - k),
            (s - 3.375 + k, 6.77 - k),
        ])
    } else {
        Path::from(vec![
            (s - 3.375 + k, -5.53 + k),
            (s + 3.375 - k, -5.53 + k),
            (s + 3.375 - k, 6.77 - k),
            (s + 1.65 - k, 6.77 - k),
            (s + 1.65 - k, 7.97 - k),
            (s - 1.65 + k, 7.97 - k),
            (s - 1.65 + k, 6.77 - k),
            (s - 3.375 + k, 6.77 - k),
        ])
    };
    let mut paths = vec![mirror_x(&right), right];
    if connected {
        paths.push(Path::from(vec![
            (-s + 3.375 - k, -2.3 + k),
            (s - 3.375 + k, -2.3 + k),
            (s - 3.375 + k, 2.3 - k),
            (-s + 3.375 - k, 2.3 - k),
        ]));
    }
    paths
}

/// The two plain Costar wire slots. Sized off the Cherry offset table.
fn costar_slots(size: f64, k: f64) -> Vec<Path> {
    let Some(s) = cherry_stab_offset(size) else {
        return Vec::new();
    };
    let right = Path::from(vec![
        (s - 1.65 + k, -6.45 + k),
        (s + 1.65 - k, -6.45 + k),
        (s + 1.65 - k, 7.75 - k),
        (s - 1.65 + k, 7.75 - k),
    ]);
    vec![mirror_x(&right), right]
}

/// The two Alps slots; sizes outside the Alps table fall back to Costar.
fn alps_slots(size: f64, k: f64) -> Vec<Path> {
    let Some(s) = alps_stab_offset(size) else {
        return costar_slots(size, k);
    };
    let right = Path::from(vec![
        (s - 1.333 + k, 3.873 + k),
        (s + 1.333 - k, 3.873 + k),
        (s + 1.333 - k, 9.08 - k),
        (s - 1.333 + k, 9.08 - k),
    ]);
    vec![mirror_x(&right), right]
}

/// The two Kailh Choc pockets with the perpendicular tab cutout.
fn kailh_choc_pockets(size: f64, k: f64) -> Vec<Path> {
    let Some(s) = kailh_choc_stab_offset(size) else {
        return Vec::new();
    };
    let right = Path::from(vec![
        (s - 3.15 + k, 2.3 - k),
        (s + 3.15 - k, 2.3 - k),
        (s + 3.15 - k, -4.3 + k),
        (s + 1.55 - k, -4.3 + k),
        (s + 1.55 - k, -7.6 + k),
        (s - 1.55 + k, -7.6 + k),
        (s - 1.55 + k, -4.3 + k),
        (s - 3.15 + k, -4.3 + k),
    ]);
    vec![mirror_x(&right), right]
}

/// Runs each stab path through the shared placement pipeline and appends it
/// to the switch layer.
#[allow(clippy::too_many_arguments)]
fn place_stabs(
    sheet: &mut Sheet,
    paths: Vec<Path>,
    key: &Key,
    center: Point,
    cluster: &Cluster,
    pivot: Point,
    vertical: bool,
    flip: bool,
) {
    for mut path in paths {
        if vertical {
            path.rotate(90.0, Point::default());
        }
        if flip {
            path.rotate(180.0, Point::default());
        }
        if key.rotate_stab != 0.0 {
            path.rotate(key.rotate_stab, Point::default());
        }
        path.translate(center);
        if let Some(r) = cluster.rotate {
            path.rotate(r, pivot);
        }
        sheet.push_cut(SWITCH_LAYER, path);
    }
}
