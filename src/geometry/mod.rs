//! Coordinate-geometry primitives: points, closed polygon paths, parametric
//! shape builders, and the polygon boolean adapter.
//!
//! Everything here works in floating-point millimetres. Only the clipper
//! adapter ([`clip`]) ever snaps to an integer grid.

pub mod clip;
pub mod path;
pub mod shapes;

pub use clip::{difference, union, PRECISION};
pub use path::{surface_area, Path, Point};
pub use shapes::{circle_polygon, round_rectangle_polygon, superellipse_polygon};

/// Converts degrees to radians.
pub(crate) fn radians(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}
