//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - variant identifiers (`VariantKind`, `VariantSelection`)
//! - taper inputs and outputs (`TaperedQuantity`, `ProfileRow`)
//! - synchronization records (`ParameterDiff`, `SyncOptions`, `VariantOutcome`)

pub mod types;

pub use types::*;
