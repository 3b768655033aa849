//! `taper-sync` library crate.
//!
//! The binary (`taper`) is a thin wrapper around this library so that:
//!
//! - taper math and variant composition are testable without spawning processes
//! - the engine seam can be driven by fakes in tests
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod crossing;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod params;
pub mod plot;
pub mod report;
pub mod sync;
pub mod taper;
pub mod variant;
