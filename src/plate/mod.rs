//! The plate pipeline.
//!
//! [`sheet::Sheet`] is the single mutable aggregate of a run. The pipeline
//! walks the parsed layout emitting per-key geometry ([`keys`]), places the
//! case mounting holes ([`case`]), and composes everything into sealed
//! per-layer keep polygons ([`finalize`]).

pub mod case;
pub mod finalize;
pub mod keys;
pub mod sheet;

pub use sheet::{Bounds, Sheet};
