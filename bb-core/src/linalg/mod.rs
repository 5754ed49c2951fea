//! Linear algebra helpers.

pub mod sparse;
