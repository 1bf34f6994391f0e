//! Output file writing.
//!
//! The pipeline hands over sealed layers (`{layer -> keep polygons}` plus
//! dimensions); this module writes one SVG per plate, runs the optional
//! EPS/DXF converters, and records the export metadata on the run result.

pub mod convert;
pub mod svg;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::models::Export;
use crate::plate::Sheet;

/// Where the output files land and how their URLs are reported.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Output directory; created if missing.
    pub directory: PathBuf,
    /// Prefix prepended to exported file names in the result metadata.
    pub serve_path: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            serve_path: "/".to_string(),
        }
    }
}

/// Writes every plate to disk and fills in the per-plate export metadata.
/// Formats whose converter fails are dropped from the run's format list;
/// the SVG itself failing is fatal.
///
/// # Errors
///
/// Fails when the output directory cannot be created or an SVG cannot be
/// written.
pub fn store_local(sheet: &mut Sheet, opts: &ExportOptions) -> Result<()> {
    fs::create_dir_all(&opts.directory).with_context(|| {
        format!("failed to create output directory {}", opts.directory.display())
    })?;

    let mut failed_formats: Vec<String> = Vec::new();
    let plates = sheet.result.plates.clone();
    for layer in &plates {
        let stem = format!("{}_{layer}", sheet.hash);
        let svg_path = opts.directory.join(format!("{stem}.svg"));
        svg::write_plate(sheet, layer, &svg_path)
            .with_context(|| format!("failed to write {}", svg_path.display()))?;
        info!("wrote {}", svg_path.display());

        let mut exports = vec![Export {
            ext: "svg".to_string(),
            url: format!("{}{stem}.svg", opts.serve_path),
        }];

        let wants_eps = sheet.result.formats.iter().any(|f| f == "eps");
        let wants_dxf = sheet.result.formats.iter().any(|f| f == "dxf");
        if wants_eps || wants_dxf {
            match convert::svg_to_eps(&svg_path) {
                Ok(eps_path) => {
                    if wants_eps {
                        exports.push(Export {
                            ext: "eps".to_string(),
                            url: format!("{}{stem}.eps", opts.serve_path),
                        });
                    }
                    if wants_dxf {
                        match convert::eps_to_dxf(&eps_path) {
                            Ok(_) => exports.push(Export {
                                ext: "dxf".to_string(),
                                url: format!("{}{stem}.dxf", opts.serve_path),
                            }),
                            Err(err) => {
                                warn!("dxf conversion failed for {stem}: {err:#}");
                                push_unique(&mut failed_formats, "dxf");
                            }
                        }
                    }
                }
                Err(err) => {
                    // DXF depends on the EPS, so both formats drop out.
                    warn!("eps conversion failed for {stem}: {err:#}");
                    push_unique(&mut failed_formats, "eps");
                    push_unique(&mut failed_formats, "dxf");
                }
            }
        }

        if let Some(details) = sheet.result.details.get_mut(layer) {
            details.exports = exports;
        }
    }

    sheet
        .result
        .formats
        .retain(|f| !failed_formats.contains(f));
    Ok(())
}

fn push_unique(formats: &mut Vec<String>, format: &str) {
    if !formats.iter().any(|f| f == format) {
        formats.push(format.to_string());
    }
}
