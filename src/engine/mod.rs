//! External simulation engine.
//!
//! The synchronizer only depends on the [`SimulationEngine`] trait. How the
//! engine is reached (here: a JSON bridge over HTTP) stays behind it.

use std::path::{Path, PathBuf};

use crate::error::EngineError;

#[cfg(test)]
pub(crate) mod fake;
pub mod http;

pub use http::HttpEngine;

/// A model loaded into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHandle {
    pub id: String,
    pub path: PathBuf,
}

/// Operations the synchronizer needs from a simulation engine.
///
/// Every call blocks until the engine answers; solves may take arbitrarily long.
pub trait SimulationEngine {
    /// Check up front that the engine can be reached.
    fn probe(&mut self) -> Result<(), EngineError>;

    fn load_model(&mut self, path: &Path) -> Result<ModelHandle, EngineError>;

    /// Current value of a parameter, or `Ok(None)` when the engine cannot
    /// report it.
    fn read_parameter(&mut self, model: &ModelHandle, name: &str) -> Result<Option<String>, EngineError>;

    /// All parameters of a model as `(name, value)` pairs.
    fn list_parameters(&mut self, model: &ModelHandle) -> Result<Vec<(String, String)>, EngineError>;

    fn set_parameter(&mut self, model: &ModelHandle, name: &str, value: &str) -> Result<(), EngineError>;

    fn build(&mut self, model: &ModelHandle) -> Result<(), EngineError>;

    fn mesh(&mut self, model: &ModelHandle) -> Result<(), EngineError>;

    fn solve(&mut self, model: &ModelHandle, study: &str) -> Result<(), EngineError>;

    fn list_export_definitions(&mut self, model: &ModelHandle) -> Result<Vec<String>, EngineError>;

    fn export_data(&mut self, model: &ModelHandle, definition: &str, out: &Path) -> Result<(), EngineError>;

    fn save_model(&mut self, model: &ModelHandle, out: &Path) -> Result<(), EngineError>;

    /// Release the model from engine memory.
    fn clear(&mut self, model: &ModelHandle) -> Result<(), EngineError>;
}
