//! Canonical parameters: the case-insensitive parameter set, unit-aware scalar
//! parsing, and the alias tables used to resolve logical fields.

pub mod aliases;
pub mod scalar;
pub mod set;

pub use scalar::*;
pub use set::*;
