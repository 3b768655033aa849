//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the taper generator and the variant synchronizer
//! - exported to CSV/JSON
//! - printed in terminal reports

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// A derived simulation configuration sharing the canonical parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Mirror,
    Defect,
    Waveguide,
}

impl VariantKind {
    pub const ALL: [VariantKind; 3] = [VariantKind::Mirror, VariantKind::Defect, VariantKind::Waveguide];

    /// Short label used in file names and log lines.
    pub fn label(self) -> &'static str {
        match self {
            VariantKind::Mirror => "mirror",
            VariantKind::Defect => "defect",
            VariantKind::Waveguide => "wg",
        }
    }

    /// Default model file name for this variant.
    pub fn default_model_file(self) -> &'static str {
        match self {
            VariantKind::Mirror => "unit_mech_sym_mirror.mph",
            VariantKind::Defect => "unit_mech_sym_mirror_defect.mph",
            VariantKind::Waveguide => "unit_mech_sym_mirror_wg.mph",
        }
    }
}

impl std::fmt::Display for VariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VariantKind {
    type Err = ParamError;

    /// Accepts the canonical names and their historical aliases, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mirror" => Ok(VariantKind::Mirror),
            "defect" | "mirror_defect" | "defectmirror" => Ok(VariantKind::Defect),
            "wg" | "waveguide" | "mirror_wg" | "mirrorwg" => Ok(VariantKind::Waveguide),
            _ => Err(ParamError::InvalidVariant { name: s.to_string() }),
        }
    }
}

/// Which variants a command should process.
///
/// Parsed from `all` or any [`VariantKind`] name or alias, case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantSelection {
    All,
    Mirror,
    Defect,
    Wg,
}

impl VariantSelection {
    pub fn variants(self) -> Vec<VariantKind> {
        match self {
            VariantSelection::All => VariantKind::ALL.to_vec(),
            VariantSelection::Mirror => vec![VariantKind::Mirror],
            VariantSelection::Defect => vec![VariantKind::Defect],
            VariantSelection::Wg => vec![VariantKind::Waveguide],
        }
    }
}

impl From<VariantKind> for VariantSelection {
    fn from(kind: VariantKind) -> Self {
        match kind {
            VariantKind::Mirror => VariantSelection::Mirror,
            VariantKind::Defect => VariantSelection::Defect,
            VariantKind::Waveguide => VariantSelection::Wg,
        }
    }
}

impl FromStr for VariantSelection {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(VariantSelection::All);
        }
        s.parse::<VariantKind>().map(VariantSelection::from)
    }
}

/// One quantity (`d` or `h`) tapered from the center cell toward both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaperedQuantity {
    /// Value at index 0.
    pub center: f64,
    /// Value approached as the index goes to `-N`.
    pub left: f64,
    /// Value approached as the index goes to `+N`.
    pub right: f64,
    /// Index scale of the transition.
    pub decay_length: f64,
    /// Knee sharpness; larger is more step-like.
    pub decay_order: f64,
}

/// One row of the taper profile artifact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub index: i64,
    pub d: f64,
    pub h: f64,
}

/// A parameter whose planned value differs from (or cannot be confirmed
/// against) the live model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDiff {
    pub name: String,
    pub current: Option<String>,
    pub planned: String,
}

/// A variant together with the model file it targets.
#[derive(Debug, Clone)]
pub struct VariantTarget {
    pub kind: VariantKind,
    pub model_path: PathBuf,
}

/// Knobs controlling a synchronization pass.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub force: bool,
    pub dry_run: bool,
    pub study: String,
    /// Export definition to use instead of the automatic pick.
    pub export_name: Option<String>,
    pub save_solved: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            force: false,
            dry_run: false,
            study: "std1".to_string(),
            export_name: None,
            save_solved: false,
        }
    }
}

/// Terminal state of one variant after a synchronization pass.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantOutcome {
    /// Engine unreachable; only the planned parameter count was reported.
    Planned { parameters: usize },
    /// Dry run; the diffs were reported and nothing was changed.
    DryReported { diffs: Vec<ParameterDiff> },
    /// Live parameters already match and no rerun was forced.
    Skipped,
    /// Parameters applied and the study solved.
    Applied {
        changed: usize,
        export: Option<PathBuf>,
        saved: Option<PathBuf>,
        warnings: Vec<String>,
    },
    /// The model file does not exist.
    ModelMissing { path: PathBuf },
    /// Load, parameter write, or solve failed.
    Failed { reason: String },
}

impl VariantOutcome {
    pub fn tag(&self) -> &'static str {
        match self {
            VariantOutcome::Planned { .. } => "PLAN",
            VariantOutcome::DryReported { .. } => "DRY",
            VariantOutcome::Skipped => "OK",
            VariantOutcome::Applied { .. } => "RUN",
            VariantOutcome::ModelMissing { .. } => "SKIP",
            VariantOutcome::Failed { .. } => "FAIL",
        }
    }
}

/// One row of an avoided-crossing sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingPoint {
    pub period_nm: f64,
    pub em_ghz: f64,
    pub om_ghz: f64,
}
