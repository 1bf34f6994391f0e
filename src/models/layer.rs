//! Output plates and run result metadata.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::geometry::Path;

/// One plate of material to be cut. Cut polygons are regions to remove,
/// keep polygons the material retained; after the pipeline seals the layer,
/// `keep_polys` already has the cuts subtracted.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    pub cut_polys: Vec<Path>,
    pub keep_polys: Vec<Path>,
    /// Set when a boolean operation failed on this layer; the remaining
    /// layers still finish so the user gets a partial preview.
    pub errored: bool,
}

/// One produced export file.
#[derive(Debug, Clone, Serialize)]
pub struct Export {
    pub ext: String,
    pub url: String,
}

/// Reported metadata for one plate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlateDetails {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub area: f64,
    pub exports: Vec<Export>,
}

/// Everything a caller needs to know about a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Plate names in output order.
    pub plates: Vec<String>,
    /// File formats produced; conversions that fail drop out of this list.
    pub formats: Vec<String>,
    pub details: BTreeMap<String, PlateDetails>,
}

impl Default for RunResult {
    fn default() -> Self {
        let mut formats = vec!["svg".to_string()];
        // The EPS/DXF converters are only wired up on Linux.
        if cfg!(target_os = "linux") {
            formats.push("eps".to_string());
            formats.push("dxf".to_string());
        }
        Self {
            plates: Vec::new(),
            formats,
            details: BTreeMap::new(),
        }
    }
}
