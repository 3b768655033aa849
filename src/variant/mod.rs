//! Variant parameter handling.
//!
//! - `compose`: canonical parameters -> per-variant parameters
//! - `diff`: per-variant parameters vs a live model

pub mod compose;
pub mod diff;

pub use compose::*;
pub use diff::*;
