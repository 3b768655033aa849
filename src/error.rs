//! Error types.
//!
//! - `AppError` is the process-level error: a message plus the exit code the
//!   `taper` binary returns.
//! - `ParamError` covers parameter resolution and taper evaluation.
//! - `EngineError` covers the external simulation engine.
//!
//! Exit codes:
//! - 2: input/config (files, JSON, CLI combinations)
//! - 3: parameter/domain errors
//! - 4: engine errors

use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Errors raised while resolving parameters or evaluating a taper.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    /// A value is not a number (optionally followed by a `[unit]` suffix).
    #[error("invalid numeric value '{value}'")]
    Parse { value: String },

    /// None of the accepted names for a required parameter is present.
    #[error("missing required parameter (tried: {})", .aliases.join(", "))]
    MissingParameter { aliases: Vec<String> },

    /// A taper step would be undefined.
    #[error("undefined taper value: {reason}")]
    Domain { reason: String },

    /// The requested variant is not one of mirror/defect/waveguide.
    #[error("unknown model variant '{name}'")]
    InvalidVariant { name: String },
}

impl ParamError {
    pub fn missing(aliases: &[&str]) -> Self {
        ParamError::MissingParameter {
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Errors raised by the external simulation engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The engine cannot be reached at all.
    #[error("simulation engine unavailable: {0}")]
    Unavailable(String),

    /// A single engine operation failed.
    #[error("engine operation '{op}' failed: {message}")]
    Operation { op: String, message: String },
}

impl EngineError {
    pub fn op(op: impl Into<String>, message: impl std::fmt::Display) -> Self {
        EngineError::Operation {
            op: op.into(),
            message: message.to_string(),
        }
    }
}

impl From<ParamError> for AppError {
    fn from(err: ParamError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Unavailable(_) => AppError::new(2, err.to_string()),
            EngineError::Operation { .. } => AppError::new(4, err.to_string()),
        }
    }
}
