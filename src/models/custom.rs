//! User-authored parametric polygons.

use serde::Deserialize;

use crate::geometry::Point;

/// A user primitive added to or cut from specific plates.
///
/// Anchor points come from two inputs: `rel_to` expressions evaluated
/// relative to the case centre, and absolute anchors accumulated from keys
/// whose `_c` index pointed at this polygon. The `points` expressions are
/// instantiated once per anchor.
///
/// `op` is `"add"` or `"cut"`; `polygon` selects the shape (`custom-circle`,
/// `custom-superellipse`, `custom-rectangle`, `custom-rounded-rectangle`,
/// `custom-path`). Unknown values degrade to emitting nothing, matching the
/// preview-friendly error policy of the rest of the pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomPolygon {
    /// Circle diameter in mm.
    pub diameter: f64,
    /// Rectangle height in mm.
    pub height: f64,
    /// Plate names this polygon applies to.
    pub layers: Vec<String>,
    /// `"add"` appends to the keep set, `"cut"` to the cut set.
    pub op: String,
    /// Semicolon-separated `[expr,expr]` pairs instantiated per anchor.
    pub points: String,
    /// Shape selector.
    pub polygon: String,
    /// Corner or superellipse radius in mm.
    pub radius: f64,
    /// Anchor expressions relative to the case centre.
    pub rel_to: String,
    /// Absolute anchors collected from keys referencing this polygon.
    #[serde(skip)]
    pub rel_abs: Vec<Point>,
    /// Rectangle width in mm.
    pub width: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_custom_polygon() {
        let cp: CustomPolygon = serde_json::from_str(
            r#"{"polygon":"custom-circle","op":"cut","diameter":5,"layers":["switch"],"points":"[0,0]","rel_to":"[x,y]"}"#,
        )
        .unwrap();
        assert_eq!(cp.polygon, "custom-circle");
        assert_eq!(cp.op, "cut");
        assert_eq!(cp.diameter, 5.0);
        assert_eq!(cp.layers, vec!["switch"]);
        assert!(cp.rel_abs.is_empty());
    }
}
