//! Data models for keys, cases, plates and custom polygons.
//!
//! These structures deserialize straight from the JSON configuration
//! document and stay independent of the geometry pipeline that consumes
//! them.

pub mod case;
pub mod custom;
pub mod key;
pub mod layer;

pub use case::{layer_display_name, Case, CaseType};
pub use custom::CustomPolygon;
pub use key::{
    alps_stab_offset, cherry_stab_offset, kailh_choc_stab_offset, Key, StabType, SwitchType,
};
pub use layer::{Export, Layer, PlateDetails, RunResult};
