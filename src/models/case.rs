//! Case parameters and plate naming.

use serde::Deserialize;

pub const SWITCH_LAYER: &str = "switch";
pub const OPEN_LAYER: &str = "open";
pub const CLOSED_LAYER: &str = "closed";
pub const TOP_LAYER: &str = "top";
pub const BOTTOM_LAYER: &str = "bottom";

/// Case style, deciding the plate set and mounting-hole pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum CaseType {
    /// Bare switch plate, no case.
    #[default]
    #[serde(rename = "")]
    None,
    /// Poker-compatible tray mount: switch plate with the fixed hole pattern.
    #[serde(rename = "poker")]
    Poker,
    /// Stacked sandwich case: switch, open, closed, top and bottom plates.
    #[serde(rename = "sandwich")]
    Sandwich,
}

impl CaseType {
    /// The plates this case style produces, in output order.
    #[must_use]
    pub fn plates(self) -> &'static [&'static str] {
        match self {
            Self::None | Self::Poker => &[SWITCH_LAYER],
            Self::Sandwich => &[SWITCH_LAYER, OPEN_LAYER, CLOSED_LAYER, TOP_LAYER, BOTTOM_LAYER],
        }
    }
}

/// Human-readable plate name for result metadata.
#[must_use]
pub fn layer_display_name(layer: &str) -> String {
    match layer {
        SWITCH_LAYER => "Switch Layer".to_string(),
        OPEN_LAYER => "Open Layer".to_string(),
        CLOSED_LAYER => "Closed Layer".to_string(),
        TOP_LAYER => "Top Layer".to_string(),
        BOTTOM_LAYER => "Bottom Layer".to_string(),
        other => other.to_string(),
    }
}

/// Plate envelope parameters, read-only after deserialization apart from the
/// effective per-edge widths the pipeline computes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Case {
    #[serde(rename = "case-type")]
    pub case_type: CaseType,
    /// Mount hole diameter in mm.
    #[serde(rename = "mount-holes-size")]
    pub hole_diameter: f64,
    /// Requested mount hole count (sandwich: at least 4 and even).
    #[serde(rename = "mount-holes-num")]
    pub holes: i64,
    /// Edge band width the holes are centred in; `0` means use the paddings.
    #[serde(rename = "mount-holes-edge")]
    pub edge_width: f64,
    /// Effective per-edge widths: the padding clamped down to `edge_width`.
    #[serde(skip)]
    pub left_width: f64,
    #[serde(skip)]
    pub right_width: f64,
    #[serde(skip)]
    pub top_width: f64,
    #[serde(skip)]
    pub bottom_width: f64,
    /// Suppresses the two Poker side slots.
    #[serde(rename = "poker-slots-remove")]
    pub remove_poker_slots: bool,
    /// USB slot centre offset from the layout centre, in mm.
    #[serde(rename = "usb-location")]
    pub usb_location: f64,
    /// USB slot width in mm.
    #[serde(rename = "usb-width")]
    pub usb_width: f64,
}

impl Default for Case {
    fn default() -> Self {
        Self {
            case_type: CaseType::None,
            hole_diameter: 0.0,
            holes: 0,
            edge_width: 0.0,
            left_width: 0.0,
            right_width: 0.0,
            top_width: 0.0,
            bottom_width: 0.0,
            remove_poker_slots: false,
            usb_location: 0.0,
            usb_width: 10.0,
        }
    }
}
