//! Geometric taper across the cell chain.
//!
//! - `curve`: the scalar saturation law
//! - `profile`: parameter resolution and per-index evaluation of `d` and `h`

pub mod curve;
pub mod profile;

pub use curve::*;
pub use profile::*;
