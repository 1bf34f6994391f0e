//! Heterogeneous layout list parsing.
//!
//! Elements are classified by type: the first top-level element may be a map
//! of sheet-level overrides; every other top-level element must be a row
//! list. Inside a row, a map carries overrides that materialise the next
//! key, and the following label element is suppressed; any other value is a
//! label for a default 1×1 key.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::geometry::Point;
use crate::models::{CaseType, CustomPolygon, Key, StabType, SwitchType};
use crate::plate::Sheet;

/// Sheet-level overrides carried by an optional leading map element.
/// Fields left out of the map keep their configured values.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SheetOverrides {
    #[serde(rename = "key-unit")]
    key_unit: Option<f64>,
    kerf: Option<f64>,
    fillet: Option<f64>,
    #[serde(rename = "top-padding")]
    top_padding: Option<f64>,
    #[serde(rename = "left-padding")]
    left_padding: Option<f64>,
    #[serde(rename = "right-padding")]
    right_padding: Option<f64>,
    #[serde(rename = "bottom-padding")]
    bottom_padding: Option<f64>,
    grow_x: Option<f64>,
    grow_y: Option<f64>,
    #[serde(rename = "switch-type")]
    switch_type: Option<SwitchType>,
    #[serde(rename = "stab-type")]
    stab_type: Option<StabType>,
    #[serde(rename = "connected-stabs")]
    connected_stabs: Option<bool>,
    #[serde(rename = "line-color")]
    line_color: Option<String>,
    #[serde(rename = "line-weight")]
    line_weight: Option<f64>,
    case: Option<CaseOverrides>,
    custom: Option<Vec<CustomPolygon>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CaseOverrides {
    #[serde(rename = "case-type")]
    case_type: Option<CaseType>,
    #[serde(rename = "mount-holes-size")]
    hole_diameter: Option<f64>,
    #[serde(rename = "mount-holes-num")]
    holes: Option<i64>,
    #[serde(rename = "mount-holes-edge")]
    edge_width: Option<f64>,
    #[serde(rename = "poker-slots-remove")]
    remove_poker_slots: Option<bool>,
    #[serde(rename = "usb-location")]
    usb_location: Option<f64>,
    #[serde(rename = "usb-width")]
    usb_width: Option<f64>,
}

/// One element of a row list.
enum RowElement<'a> {
    /// A map of per-key overrides; materialises the key by itself.
    Overrides(&'a Map<String, Value>),
    /// A keycap label (or any non-map value); stands for a default key
    /// unless the preceding element already materialised it.
    Label,
}

fn classify(value: &Value) -> RowElement<'_> {
    match value {
        Value::Object(map) => RowElement::Overrides(map),
        _ => RowElement::Label,
    }
}

/// Parses `sheet.raw_layout` into the `rows × keys` matrix, applying any
/// leading sheet-override map along the way.
///
/// # Errors
///
/// Fails when a top-level element is not a row list or a key map carries
/// values of the wrong type; the error names the offending element.
pub fn parse_layout(sheet: &mut Sheet) -> Result<()> {
    let raw = std::mem::take(&mut sheet.raw_layout);
    let mut rows: &[Value] = &raw;
    if let Some(Value::Object(map)) = raw.first() {
        let overrides_preview = Value::Object(map.clone());
        info!("applying layout sheet overrides: {}", overrides_preview);
        apply_overrides(sheet, map).context("invalid sheet overrides in layout")?;
        // One-shot normalisation so later math adds the halves directly.
        sheet.grow_half = Point::new(sheet.grow_x / 2.0, sheet.grow_y / 2.0);
        rows = &raw[1..];
    }
    let mut key_map = false;
    for (ri, row_value) in rows.iter().enumerate() {
        let Value::Array(items) = row_value else {
            bail!("layout row {ri} is not a list: {row_value}");
        };
        let mut row_keys: Vec<Key> = Vec::new();
        for (ki, item) in items.iter().enumerate() {
            match classify(item) {
                RowElement::Overrides(map) => {
                    let mut key: Key = serde_json::from_value(Value::Object(map.clone()))
                        .with_context(|| {
                            format!("invalid key overrides at row {ri}, element {ki}: {item}")
                        })?;
                    if key.width < 1.0 {
                        key.width = 1.0;
                    }
                    if key.height < 1.0 {
                        key.height = 1.0;
                    }
                    // A negative offset tucks this key under the previous one.
                    if key.x_rel < 0.0 {
                        if let Some(prev) = row_keys.last_mut() {
                            prev.stacked = true;
                        }
                    }
                    row_keys.push(key);
                    key_map = true;
                }
                RowElement::Label => {
                    if !key_map {
                        row_keys.push(Key {
                            width: 1.0,
                            height: 1.0,
                            ..Key::default()
                        });
                    }
                    key_map = false;
                }
            }
        }
        sheet.layout.push(row_keys);
    }
    Ok(())
}

fn apply_overrides(sheet: &mut Sheet, map: &Map<String, Value>) -> Result<()> {
    let overrides: SheetOverrides = serde_json::from_value(Value::Object(map.clone()))?;
    if let Some(v) = overrides.key_unit {
        sheet.u1 = v;
    }
    if let Some(v) = overrides.kerf {
        // The sheet kerf was halved before parsing started; an override at
        // this point lands in the working value as-is.
        sheet.kerf = v;
        sheet.kerf_half = v;
    }
    if let Some(v) = overrides.fillet {
        sheet.fillet = v;
    }
    if let Some(v) = overrides.top_padding {
        sheet.top_pad = v;
    }
    if let Some(v) = overrides.left_padding {
        sheet.left_pad = v;
    }
    if let Some(v) = overrides.right_padding {
        sheet.right_pad = v;
    }
    if let Some(v) = overrides.bottom_padding {
        sheet.bottom_pad = v;
    }
    if let Some(v) = overrides.grow_x {
        sheet.grow_x = v;
    }
    if let Some(v) = overrides.grow_y {
        sheet.grow_y = v;
    }
    if let Some(v) = overrides.switch_type {
        sheet.switch_type = v;
    }
    if let Some(v) = overrides.stab_type {
        sheet.stab_type = v;
    }
    if let Some(v) = overrides.connected_stabs {
        sheet.connected_stabs = v;
    }
    if let Some(v) = overrides.line_color {
        sheet.line_color = v;
    }
    if let Some(v) = overrides.line_weight {
        sheet.line_weight = v;
    }
    if let Some(case) = overrides.case {
        if let Some(v) = case.case_type {
            sheet.case.case_type = v;
        }
        if let Some(v) = case.hole_diameter {
            sheet.case.hole_diameter = v;
        }
        if let Some(v) = case.holes {
            sheet.case.holes = v;
        }
        if let Some(v) = case.edge_width {
            sheet.case.edge_width = v;
        }
        if let Some(v) = case.remove_poker_slots {
            sheet.case.remove_poker_slots = v;
        }
        if let Some(v) = case.usb_location {
            sheet.case.usb_location = v;
        }
        if let Some(v) = case.usb_width {
            sheet.case.usb_width = v;
        }
    }
    if let Some(custom) = overrides.custom {
        sheet.custom_polygons = custom;
    }
    Ok(())
}
