//! EPS and DXF conversion via the external `inkscape` and `pstoedit` tools.
//!
//! Both converters are best-effort: a missing tool or failed run surfaces as
//! an error the caller downgrades to dropping that format from the run.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

/// Converts an SVG file to EPS with inkscape, returning the EPS path.
///
/// # Errors
///
/// Fails when inkscape is unavailable or exits non-zero.
pub fn svg_to_eps(svg_path: &Path) -> Result<PathBuf> {
    let eps_path = svg_path.with_extension("eps");
    let status = Command::new("inkscape")
        .arg("-E")
        .arg(&eps_path)
        .arg(svg_path)
        .status()
        .context("failed to run inkscape")?;
    if !status.success() {
        bail!("inkscape exited with {status}");
    }
    Ok(eps_path)
}

/// Converts an EPS file to DXF with pstoedit, returning the DXF path.
///
/// # Errors
///
/// Fails when pstoedit is unavailable or exits non-zero.
pub fn eps_to_dxf(eps_path: &Path) -> Result<PathBuf> {
    let dxf_path = eps_path.with_extension("dxf");
    let output = Command::new("pstoedit")
        .args(["-dt", "-f", "dxf: -polyaslines -mm"])
        .arg(eps_path)
        .arg(&dxf_path)
        .output()
        .context("failed to run pstoedit")?;
    if !output.status.success() {
        bail!(
            "pstoedit exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stdout)
        );
    }
    Ok(dxf_path)
}
