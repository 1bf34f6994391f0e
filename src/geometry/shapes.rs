//! Parametric polygon builders.
//!
//! Arcs are approximated with chord geometry: each segment advances the pen
//! by `2r·cos(β)·(sin α, cos α)` where `β = 90° − 90°/(2n)` and `α` steps in
//! `90°/n` increments, which keeps every vertex on the true circle.

use super::path::{Path, Point};
use super::radians;

/// A rectangle with optional rounded corners, centred at `(cx, cy)`.
/// With `r = 0` and `segments = 0` the result is a sharp-cornered rectangle.
#[must_use]
pub fn round_rectangle_polygon(cx: f64, cy: f64, w: f64, h: f64, r: f64, segments: usize) -> Path {
    let mut pts = Path::default();
    corner(cx + w / 2.0 - r, cy - h / 2.0, r, 0.0, segments, &mut pts);
    corner(cx + w / 2.0, cy + h / 2.0 - r, r, -90.0, segments, &mut pts);
    corner(cx - w / 2.0 + r, cy + h / 2.0, r, 180.0, segments, &mut pts);
    corner(cx - w / 2.0, cy - h / 2.0 + r, r, 90.0, segments, &mut pts);
    pts
}

/// One convex quarter arc, starting from the pen position `(x, y)`.
fn corner(x: f64, y: f64, r: f64, a: f64, segments: usize, out: &mut Path) {
    let n = segments as f64;
    let mut p = Point::new(x, y);
    out.0.push(p);
    let la = radians(90.0 - 90.0 / (2.0 * n));
    for j in 1..=segments {
        let j = j as f64;
        let sa = radians(90.0 - (90.0 / (2.0 * n)) * (2.0 * j - 1.0) + a);
        p.x += 2.0 * r * la.cos() * sa.sin();
        p.y += 2.0 * r * la.cos() * sa.cos();
        out.0.push(p);
    }
}

/// A circle of radius `r` centred at `(cx, cy)`, approximated by `4·segments`
/// equal chords beginning at `(cx, cy - r)`.
#[must_use]
pub fn circle_polygon(cx: f64, cy: f64, r: f64, segments: usize) -> Path {
    let n = segments as f64;
    let mut pts = Path::default();
    let mut p = Point::new(cx, cy - r);
    pts.0.push(p);
    let la = radians(90.0 - 90.0 / (2.0 * n));
    for j in 1..(4 * segments) {
        let j = j as f64;
        let sa = radians(90.0 - (90.0 / (2.0 * n)) * (2.0 * j - 1.0));
        p.x += 2.0 * r * la.cos() * sa.sin();
        p.y += 2.0 * r * la.cos() * sa.cos();
        pts.0.push(p);
    }
    pts
}

/// A superellipse of radius `r` centred at `(cx, cy)`: four concave quarter
/// arcs (an inverted circle), `segments` chords each.
#[must_use]
pub fn superellipse_polygon(cx: f64, cy: f64, r: f64, segments: usize) -> Path {
    let mut pts = Path::default();
    quadrant(cx, cy - r, r, 90.0, segments, &mut pts);
    quadrant(cx + r, cy, r, 0.0, segments, &mut pts);
    quadrant(cx, cy + r, r, -90.0, segments, &mut pts);
    quadrant(cx - r, cy, r, 180.0, segments, &mut pts);
    pts
}

/// One concave quarter arc, starting from the pen position `(x, y)`.
fn quadrant(x: f64, y: f64, r: f64, a: f64, segments: usize, out: &mut Path) {
    let n = segments as f64;
    let mut p = Point::new(x, y);
    out.0.push(p);
    let la = radians(90.0 + 90.0 / (2.0 * n));
    for j in 1..=segments {
        let j = j as f64;
        let sa = radians(90.0 + (90.0 / (2.0 * n)) * (2.0 * j - 1.0) + a);
        p.x += 2.0 * r * la.cos() * sa.sin();
        p.y += 2.0 * r * la.cos() * sa.cos();
        out.0.push(p);
    }
}
