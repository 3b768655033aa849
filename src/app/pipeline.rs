//! Shared workflow steps used by the CLI handlers.
//!
//! Keeping these as plain functions (no printing, no argv) keeps the handlers in
//! `app` focused on presentation and makes the workflows testable.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::{ProfileRow, VariantTarget};
use crate::engine::SimulationEngine;
use crate::error::AppError;
use crate::params::{ParameterSet, aliases, parse_scalar};
use crate::report::format_parameters;
use crate::sync::{EngineStep, settle};
use crate::taper::TaperSpec;

/// Half-width used when the parameter file does not define one.
pub const DEFAULT_HALF_WIDTH: i64 = 17;

/// Values forced into the canonical file by `taper profile`.
#[derive(Debug, Clone, Default)]
pub struct ProfileOverrides {
    pub wg_cell_w_1: Option<String>,
    pub n_ext: Option<u32>,
    pub d0: Option<f64>,
    pub h0: Option<f64>,
    pub delx: Option<f64>,
    pub m: Option<f64>,
}

/// Output of the profile workflow.
#[derive(Debug, Clone)]
pub struct ProfileRun {
    /// Canonical parameters after overrides (what gets saved).
    pub params: ParameterSet,
    pub spec: TaperSpec,
    pub rows: Vec<ProfileRow>,
}

/// Apply overrides and make sure `n_ext` is always present.
pub fn apply_profile_overrides(base: &ParameterSet, overrides: &ProfileOverrides) -> ParameterSet {
    let mut params = base.clone();

    if let Some(width) = &overrides.wg_cell_w_1 {
        let key = params
            .find_name(|k| k.to_lowercase().replace('-', "_") == "wg_cell_w_1")
            .unwrap_or(aliases::WG_CELL_WIDTH)
            .to_string();
        params.insert(key, width.as_str());
    }

    let n = overrides
        .n_ext
        .map(i64::from)
        .or_else(|| half_width_from(&params))
        .unwrap_or_else(|| {
            warn!("parameter n_ext not found; defaulting to N={DEFAULT_HALF_WIDTH}");
            DEFAULT_HALF_WIDTH
        });
    params.insert("n_ext", n.to_string());

    for (name, value) in [
        ("d0", overrides.d0),
        ("h0", overrides.h0),
        ("delx", overrides.delx),
        ("M", overrides.m),
    ] {
        if let Some(v) = value {
            params.insert(name, v.to_string());
        }
    }

    params
}

/// First half-width alias that parses; unparseable ones are skipped.
fn half_width_from(params: &ParameterSet) -> Option<i64> {
    aliases::HALF_WIDTH.iter().find_map(|alias| {
        params
            .get(alias)
            .and_then(|v| parse_scalar(v).ok())
            .filter(|v| v.is_finite())
            .map(|v| v.round() as i64)
    })
}

/// Apply overrides, then resolve and evaluate the taper.
pub fn run_profile(base: &ParameterSet, overrides: &ProfileOverrides) -> Result<ProfileRun, AppError> {
    let params = apply_profile_overrides(base, overrides);
    let spec = TaperSpec::resolve(&params)?;
    let rows = spec.evaluate()?;
    Ok(ProfileRun { params, spec, rows })
}

/// Read and print every target model's parameters.
///
/// Returns the number of models read. Models that fail to load or list, or
/// whose names collide case-insensitively when saving JSON, are reported and
/// skipped.
pub fn inspect_models<E: SimulationEngine + ?Sized>(
    engine: &mut E,
    targets: &[VariantTarget],
    save_json: bool,
) -> Result<usize, AppError> {
    let missing: Vec<&str> = targets
        .iter()
        .filter(|t| !t.model_path.exists())
        .map(|t| t.kind.label())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::new(
            2,
            format!("Missing model files for: {}", missing.join(", ")),
        ));
    }
    engine.probe()?;

    let mut read = 0;
    for target in targets {
        let kind = target.kind;
        let model = match engine.load_model(&target.model_path) {
            Ok(m) => m,
            Err(err) => {
                warn!(variant = %kind, "failed to read parameters: {err}");
                continue;
            }
        };
        let listed = engine.list_parameters(&model);
        let mut warnings = Vec::new();
        let _ = settle(EngineStep::Clear, kind, engine.clear(&model), &mut warnings);

        let params = match listed {
            Ok(p) => p,
            Err(err) => {
                warn!(variant = %kind, "failed to read parameters: {err}");
                continue;
            }
        };
        print!("{}", format_parameters(kind.label(), &target.model_path, &params));

        if save_json {
            let out = parameters_json_path(&target.model_path);
            let set = match listing_to_set(&params) {
                Ok(set) => set,
                Err(name) => {
                    warn!(variant = %kind, "parameter '{name}' is duplicated ignoring case; not writing {}", out.display());
                    continue;
                }
            };
            crate::io::write_params_json(&out, &set)?;
            info!(variant = %kind, "wrote {}", out.display());
        }
        read += 1;
    }
    Ok(read)
}

/// Read the canonical parameters out of a model through the engine.
///
/// Used by `taper profile` when the parameter JSON is missing or unreadable.
pub fn params_from_model<E: SimulationEngine + ?Sized>(
    engine: &mut E,
    model_path: &Path,
) -> Result<ParameterSet, AppError> {
    if !model_path.exists() {
        return Err(AppError::new(
            2,
            format!("Model file not found: {}", model_path.display()),
        ));
    }
    engine.probe()?;

    let model = engine.load_model(model_path)?;
    let listed = engine.list_parameters(&model);
    if let Err(err) = engine.clear(&model) {
        warn!("failed to release {}: {err}", model_path.display());
    }
    let listed = listed?;

    let set = listing_to_set(&listed).map_err(|name| {
        AppError::new(
            4,
            format!("Model parameter '{name}' in {} is duplicated ignoring case", model_path.display()),
        )
    })?;
    info!("loaded {} parameters from {}", set.len(), model_path.display());
    Ok(set)
}

/// Engine listing as a parameter set; `Err` names the first case-insensitive duplicate.
fn listing_to_set(listed: &[(String, String)]) -> Result<ParameterSet, String> {
    ParameterSet::try_from_pairs(listed.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

/// `<dir>/<stem>_parameters.json`
pub fn parameters_json_path(model_path: &Path) -> PathBuf {
    let stem = model_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    model_path.with_file_name(format!("{stem}_parameters.json"))
}
