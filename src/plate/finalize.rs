//! Per-layer boolean composition: USB and inner-frame cuts, the outer keep
//! outline, cut/keep unions, keep-minus-cut differences and custom polygon
//! application.

use tracing::{error, warn};

use crate::geometry::{
    circle_polygon, difference, round_rectangle_polygon, superellipse_polygon, surface_area, union,
    Path, Point,
};
use crate::models::case::{CLOSED_LAYER, OPEN_LAYER};
use crate::models::{CustomPolygon, Layer};
use crate::parser::expression;

use super::sheet::Sheet;

/// Seals every layer: composes its cut and keep polygon sets into the final
/// retained material and records the surface area. Boolean failures flag the
/// layer errored and the remaining layers still finish.
pub(crate) fn finalize_polygons(sheet: &mut Sheet) {
    let corner_segments = if sheet.fillet == 0.0 { 0 } else { 20 };
    let plates = sheet.result.plates.clone();
    for layer_name in &plates {
        match layer_name.as_str() {
            OPEN_LAYER => {
                add_usb_cut(sheet);
                add_frame_cut(sheet, OPEN_LAYER);
            }
            CLOSED_LAYER => add_frame_cut(sheet, CLOSED_LAYER),
            _ => {}
        }

        let Some(mut layer) = sheet.layers.remove(layer_name.as_str()) else {
            continue;
        };

        // The starting keep region is the outer plate outline.
        layer.keep_polys = vec![round_rectangle_polygon(
            sheet.dmz + sheet.width / 2.0,
            sheet.dmz + sheet.height / 2.0,
            sheet.width,
            sheet.height,
            sheet.fillet,
            corner_segments,
        )];

        compose(sheet, &mut layer, layer_name, true);
        apply_custom_polygons(sheet, &mut layer, layer_name);
        compose(sheet, &mut layer, layer_name, false);

        sheet.layers.insert(layer_name.clone(), layer);
    }
}

/// Unions the cut and keep sets into canonical rings, optionally records the
/// layer surface area, then subtracts cut from keep.
fn compose(sheet: &mut Sheet, layer: &mut Layer, name: &str, record_area: bool) {
    if !layer.cut_polys.is_empty() {
        match union(&layer.cut_polys) {
            Ok(cuts) => layer.cut_polys = cuts,
            Err(err) => {
                error!("cut union failed for {}/{name}: {err:#}", sheet.hash);
                error!("offending cut polygons: {:?}", layer.cut_polys);
                layer.errored = true;
            }
        }
    }
    if !layer.keep_polys.is_empty() {
        match union(&layer.keep_polys) {
            Ok(keeps) => layer.keep_polys = keeps,
            Err(err) => {
                error!("keep union failed for {}/{name}: {err:#}", sheet.hash);
                error!("offending keep polygons: {:?}", layer.keep_polys);
                layer.errored = true;
            }
        }
    }
    if record_area {
        if let Some(details) = sheet.result.details.get_mut(name) {
            details.area = surface_area(&layer.keep_polys) - surface_area(&layer.cut_polys);
        }
    }
    if !layer.cut_polys.is_empty() {
        match difference(&layer.keep_polys, &layer.cut_polys) {
            Ok(keeps) => layer.keep_polys = keeps,
            Err(err) => {
                error!("keep/cut difference failed for {}/{name}: {err:#}", sheet.hash);
                layer.errored = true;
            }
        }
    }
}

/// The USB slot on the open layer: a kerf-inset rectangle through the top
/// band, clamped to stay inside the side edges, overdrawn 1 mm past the
/// outer edge so the subtraction fully severs it.
fn add_usb_cut(sheet: &mut Sheet) {
    let case = &sheet.case;
    let limit = sheet.width / 2.0 - case.edge_width - case.usb_width / 2.0;
    let mut usb_shift = case.usb_location;
    if usb_shift < -limit {
        usb_shift = -limit;
    }
    if usb_shift > limit {
        usb_shift = limit;
    }
    let mut usb_width = case.usb_width;
    if usb_width > sheet.width - 2.0 * case.edge_width - 2.0 * sheet.kerf_half {
        usb_width = sheet.width - 2.0 * case.edge_width - 2.0 * sheet.kerf_half;
        usb_shift = 0.0;
    }
    let k = sheet.kerf_half;
    let center = Point::new(
        sheet.layout_center.x + usb_shift,
        sheet.dmz + sheet.top_pad / 2.0 + k,
    );
    let mut usb = Path::from(vec![
        (-usb_width / 2.0 + k, -sheet.top_pad / 2.0 - k),
        (usb_width / 2.0 - k, -sheet.top_pad / 2.0 - k),
        (usb_width / 2.0 - k, sheet.top_pad / 2.0 + k),
        (-usb_width / 2.0 + k, sheet.top_pad / 2.0 + k),
    ]);
    usb.translate(center);
    usb.0[0].y -= 1.0;
    usb.0[1].y -= 1.0;
    sheet.push_cut(OPEN_LAYER, usb);
}

/// The inner frame on the open and closed layers: the region inside the
/// effective edge bands falls away.
fn add_frame_cut(sheet: &mut Sheet, layer: &str) {
    let k = sheet.kerf_half;
    let case = &sheet.case;
    let mut frame = Path::from(vec![
        (
            -sheet.width / 2.0 + 2.0 * k + case.left_width,
            -sheet.height / 2.0 + 2.0 * k + case.top_width,
        ),
        (
            sheet.width / 2.0 - 2.0 * k - case.right_width,
            -sheet.height / 2.0 + 2.0 * k + case.top_width,
        ),
        (
            sheet.width / 2.0 - 2.0 * k - case.right_width,
            sheet.height / 2.0 - 2.0 * k - case.bottom_width,
        ),
        (
            -sheet.width / 2.0 + 2.0 * k + case.left_width,
            sheet.height / 2.0 - 2.0 * k - case.bottom_width,
        ),
    ]);
    frame.translate(sheet.case_center);
    sheet.push_cut(layer, frame);
}

/// Applies every custom polygon targeting this layer: evaluates its anchor
/// points, instantiates one shape per anchor and routes the result into the
/// keep or cut set.
fn apply_custom_polygons(sheet: &Sheet, layer: &mut Layer, layer_name: &str) {
    for cp in &sheet.custom_polygons {
        if !cp.layers.iter().any(|l| l == layer_name) {
            continue;
        }
        let paths = instantiate_anchors(sheet, cp);
        if !paths.first().is_some_and(|p| !p.is_empty()) {
            continue;
        }
        let mut polygons: Vec<Path> = Vec::new();
        match cp.polygon.as_str() {
            "custom-circle" => {
                for path in &paths {
                    for pt in path.iter() {
                        polygons.push(circle_polygon(pt.x, pt.y, cp.diameter / 2.0, 20));
                    }
                }
            }
            "custom-superellipse" => {
                for path in &paths {
                    for pt in path.iter() {
                        polygons.push(superellipse_polygon(pt.x, pt.y, cp.radius, 20));
                    }
                }
            }
            "custom-rectangle" => {
                for path in &paths {
                    for pt in path.iter() {
                        polygons.push(round_rectangle_polygon(pt.x, pt.y, cp.width, cp.height, 0.0, 0));
                    }
                }
            }
            "custom-rounded-rectangle" => {
                for path in &paths {
                    for pt in path.iter() {
                        polygons.push(round_rectangle_polygon(
                            pt.x, pt.y, cp.width, cp.height, cp.radius, 20,
                        ));
                    }
                }
            }
            "custom-path" => {
                for path in &paths {
                    if path.len() > 2 {
                        polygons.push(path.clone());
                    }
                }
            }
            other => warn!("unknown custom polygon shape '{other}'"),
        }
        if polygons.is_empty() {
            continue;
        }
        match cp.op.as_str() {
            "add" => layer.keep_polys.extend(polygons),
            "cut" => layer.cut_polys.extend(polygons),
            other => warn!("unknown custom polygon op '{other}'"),
        }
    }
}

/// Instantiates the polygon's point list at every anchor: `rel_to` anchors
/// evaluated relative to the case centre plus the absolute anchors collected
/// from keys.
fn instantiate_anchors(sheet: &Sheet, cp: &CustomPolygon) -> Vec<Path> {
    let template = parse_point_list(sheet, &cp.points);
    let mut anchors = parse_point_list(sheet, &cp.rel_to);
    anchors.translate(sheet.case_center);
    anchors.0.extend(cp.rel_abs.iter().copied());
    let mut paths = Vec::new();
    for anchor in anchors.iter() {
        let mut instance = template.clone();
        instance.translate(*anchor);
        paths.push(instance);
    }
    paths
}

/// Parses semicolon-separated `[expr,expr]` pairs, evaluating each
/// expression with `x`/`y` bound to the half-dimensions of the drawing.
/// A point that fails to parse or evaluate is skipped with a warning.
fn parse_point_list(sheet: &Sheet, text: &str) -> Path {
    let mut points = Path::default();
    let cleaned = text.replace(' ', "").to_lowercase();
    for pair in cleaned.split(';') {
        let pair = pair.replace(['[', ']'], "");
        let exprs: Vec<&str> = pair.split(',').collect();
        if exprs.len() != 2 {
            continue;
        }
        let x = match expression::eval(exprs[0], sheet.width / 2.0, sheet.height / 2.0) {
            Ok(v) => v,
            Err(err) => {
                warn!("skipping custom point, bad x expression '{}': {err:#}", exprs[0]);
                continue;
            }
        };
        let y = match expression::eval(exprs[1], sheet.width / 2.0, sheet.height / 2.0) {
            Ok(v) => v,
            Err(err) => {
                warn!("skipping custom point, bad y expression '{}': {err:#}", exprs[1]);
                continue;
            }
        };
        points.0.push(Point::new(x, y));
    }
    points
}
