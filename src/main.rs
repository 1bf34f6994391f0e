//! platecad - keyboard plate drawing generator
//!
//! Reads a JSON configuration describing a keyboard layout and case, runs
//! the geometry pipeline, and writes one cut-ready drawing per plate.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use platecad::export::{self, ExportOptions};
use platecad::Sheet;

/// Generate keyboard plate fabrication drawings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Keyboard layout file; overrides the layout in the configuration file
    #[arg(short, long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// File prefix for the output
    #[arg(long, default_value = "output")]
    hash: String,

    /// Output directory
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config = fs::read_to_string(&cli.config)
        .with_context(|| format!("failed to read config file {}", cli.config.display()))?;
    let mut sheet = Sheet::from_json(&config)?;

    if let Some(layout_path) = &cli.layout {
        let layout = fs::read_to_string(layout_path)
            .with_context(|| format!("failed to read layout file {}", layout_path.display()))?;
        sheet.raw_layout = serde_json::from_str(&layout)
            .with_context(|| format!("failed to parse layout file {}", layout_path.display()))?;
    }

    sheet.hash = cli.hash;
    sheet.generate()?;
    export::store_local(
        &mut sheet,
        &ExportOptions {
            directory: cli.dir,
            serve_path: "/".to_string(),
        },
    )?;

    for plate in &sheet.result.plates {
        let details = &sheet.result.details[plate];
        info!(
            "{}: {:.3} x {:.3} mm, area {:.3} mm^2, {} file(s)",
            details.name,
            details.width,
            details.height,
            details.area,
            details.exports.len()
        );
    }
    Ok(())
}
