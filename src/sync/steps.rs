//! Engine steps and how their failures are handled.
//!
//! Build, mesh, export, save and clear are best effort: a failure is logged,
//! recorded as a warning and the pass continues. Solve failures end the
//! variant's pass.

use tracing::warn;

use crate::domain::VariantKind;
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log, record a warning, keep going.
    Swallow,
    /// Abort the current variant.
    Propagate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStep {
    Build,
    Mesh,
    Solve,
    Export,
    Save,
    Clear,
}

impl EngineStep {
    pub fn name(self) -> &'static str {
        match self {
            EngineStep::Build => "build",
            EngineStep::Mesh => "mesh",
            EngineStep::Solve => "solve",
            EngineStep::Export => "export",
            EngineStep::Save => "save",
            EngineStep::Clear => "clear",
        }
    }

    pub fn policy(self) -> FailurePolicy {
        match self {
            EngineStep::Solve => FailurePolicy::Propagate,
            _ => FailurePolicy::Swallow,
        }
    }
}

/// Apply a step's failure policy to its result.
///
/// Swallowed failures are logged and appended to `warnings`, and yield
/// `Ok(None)`; propagated failures are returned as `Err`.
pub fn settle<T>(
    step: EngineStep,
    kind: VariantKind,
    result: Result<T, EngineError>,
    warnings: &mut Vec<String>,
) -> Result<Option<T>, EngineError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(err) => match step.policy() {
            FailurePolicy::Propagate => Err(err),
            FailurePolicy::Swallow => {
                warn!(variant = %kind, step = step.name(), "{err}");
                warnings.push(format!("{} failed: {err}", step.name()));
                Ok(None)
            }
        },
    }
}
