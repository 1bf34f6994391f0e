//! platecad
//!
//! Generates 2D fabrication drawings (cut-layer plates) for mechanical
//! keyboards from a declarative layout description: switch and stabilizer
//! openings, case outlines, mounting holes, USB cut-outs and user-defined
//! custom polygons, composed with polygon boolean operations and written out
//! as per-plate SVG (plus EPS/DXF where the converters exist).

pub mod constants;
pub mod export;
pub mod geometry;
pub mod models;
pub mod parser;
pub mod plate;

pub use plate::Sheet;
