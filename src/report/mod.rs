//! Reporting utilities: profile tables, sync summaries, parameter listings.

pub mod format;

pub use format::*;
