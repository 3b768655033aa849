//! Input/output helpers.
//!
//! - canonical parameter JSON read/write (`params`)
//! - taper profile CSV export (`profile`)
//! - avoided-crossing CSV read/write (`crossing`)

pub mod crossing;
pub mod params;
pub mod profile;

pub use crossing::*;
pub use params::*;
pub use profile::*;
