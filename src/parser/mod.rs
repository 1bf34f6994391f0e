//! Layout document parsing.
//!
//! The layout field of the configuration document is a heterogeneous list:
//! an optional leading map of sheet-level overrides followed by rows of keys,
//! where strings label default keys and maps override the next key. This
//! module flattens that into a homogeneous matrix of [`crate::models::Key`]
//! and evaluates the arithmetic expressions custom polygons may carry.

pub mod expression;
pub mod layout;

pub use layout::parse_layout;
