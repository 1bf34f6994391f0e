//! SVG plate writer.
//!
//! One `<polygon>` element per keep ring, stroked with the sheet's line
//! style, on a canvas padded by the margin on every side. Coordinates are
//! printed with three decimals, matching the precision of the boolean grid.

use std::path::Path as FsPath;

use anyhow::Result;
use svg::node::element::Polygon;
use svg::Document;

use crate::plate::Sheet;

/// Writes one plate's keep polygons as an SVG document.
///
/// # Errors
///
/// Fails when the file cannot be written.
pub fn write_plate(sheet: &Sheet, layer: &str, path: &FsPath) -> Result<()> {
    let canvas_w = sheet.width + 2.0 * sheet.dmz;
    let canvas_h = sheet.height + 2.0 * sheet.dmz;
    let style = format!(
        "fill:none;stroke-width:{}mm;stroke:{}",
        sheet.line_weight, sheet.line_color
    );

    let mut document = Document::new()
        .set("width", format!("{canvas_w}{}", sheet.unit))
        .set("height", format!("{canvas_h}{}", sheet.unit))
        .set("viewBox", format!("0 0 {canvas_w} {canvas_h}"));

    if let Some(plate) = sheet.layers.get(layer) {
        for poly in &plate.keep_polys {
            if poly.is_empty() {
                continue;
            }
            let points = poly
                .iter()
                .map(|p| format!("{:.3},{:.3}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            document = document.add(Polygon::new().set("points", points).set("style", style.clone()));
        }
    }

    svg::save(path, &document)?;
    Ok(())
}
