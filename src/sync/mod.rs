//! Variant synchronization.
//!
//! Per variant, in order:
//!
//! 1. compose the variant's planned parameters
//! 2. diff them against the loaded model
//! 3. dry run: report the diffs and stop
//! 4. nothing changed and not forced: skip
//! 5. apply the diffs, build + mesh (best effort), solve
//! 6. export a result table and optionally save a solved copy (best effort)
//! 7. clear the model from the engine, on every path
//!
//! Variants run one after another. A failed variant is recorded and the pass
//! moves on to the next one.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::domain::{SyncOptions, VariantKind, VariantOutcome, VariantTarget};
use crate::engine::{ModelHandle, SimulationEngine};
use crate::error::EngineError;
use crate::params::ParameterSet;
use crate::variant::{compose_variant_parameters, detect_mismatches};

pub mod steps;

pub use steps::*;

/// Substrings that mark an export definition as the result table we want.
const PREFERRED_EXPORTS: [&str; 3] = ["band", "global", "diag"];

/// Result of one variant.
#[derive(Debug, Clone)]
pub struct VariantResult {
    pub kind: VariantKind,
    pub model_path: PathBuf,
    pub outcome: VariantOutcome,
}

/// Result of a whole synchronization pass.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub started: DateTime<Local>,
    /// True when the engine was unreachable and nothing was diffed or applied.
    pub report_only: bool,
    pub unavailable_reason: Option<String>,
    pub results: Vec<VariantResult>,
}

/// Synchronize every target against the engine.
///
/// If the engine fails its up-front probe the pass degrades to
/// [`plan_only`].
pub fn synchronize<E: SimulationEngine + ?Sized>(
    engine: &mut E,
    base: &ParameterSet,
    targets: &[VariantTarget],
    opts: &SyncOptions,
) -> SyncReport {
    if let Err(err) = engine.probe() {
        return plan_only(base, targets, opts, err);
    }

    let started = Local::now();
    let mut results = Vec::with_capacity(targets.len());
    for target in targets {
        let outcome = sync_variant(engine, target, base, opts);
        results.push(VariantResult {
            kind: target.kind,
            model_path: target.model_path.clone(),
            outcome,
        });
    }

    SyncReport {
        started,
        report_only: false,
        unavailable_reason: None,
        results,
    }
}

/// Compose every target and report what would be set, without an engine.
pub fn plan_only(
    base: &ParameterSet,
    targets: &[VariantTarget],
    opts: &SyncOptions,
    reason: EngineError,
) -> SyncReport {
    warn!("{reason}; reporting planned changes only");
    let results = targets
        .iter()
        .map(|target| {
            let planned = compose_variant_parameters(target.kind, base);
            info!(
                variant = %target.kind,
                "would set {} parameters; forced run={}",
                planned.len(),
                opts.force
            );
            VariantResult {
                kind: target.kind,
                model_path: target.model_path.clone(),
                outcome: VariantOutcome::Planned {
                    parameters: planned.len(),
                },
            }
        })
        .collect();

    SyncReport {
        started: Local::now(),
        report_only: true,
        unavailable_reason: Some(reason.to_string()),
        results,
    }
}

fn sync_variant<E: SimulationEngine + ?Sized>(
    engine: &mut E,
    target: &VariantTarget,
    base: &ParameterSet,
    opts: &SyncOptions,
) -> VariantOutcome {
    let kind = target.kind;
    if !target.model_path.exists() {
        warn!(variant = %kind, "model not found: {}", target.model_path.display());
        return VariantOutcome::ModelMissing {
            path: target.model_path.clone(),
        };
    }

    let planned = compose_variant_parameters(kind, base);
    let model = match engine.load_model(&target.model_path) {
        Ok(m) => m,
        Err(err) => {
            warn!(variant = %kind, "{err}");
            return VariantOutcome::Failed {
                reason: err.to_string(),
            };
        }
    };

    let outcome = match run_loaded(engine, &model, kind, &planned, opts) {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(variant = %kind, "{err}");
            VariantOutcome::Failed {
                reason: err.to_string(),
            }
        }
    };

    let mut clear_warnings = Vec::new();
    let _ = settle(EngineStep::Clear, kind, engine.clear(&model), &mut clear_warnings);
    match outcome {
        VariantOutcome::Applied {
            changed,
            export,
            saved,
            mut warnings,
        } => {
            warnings.extend(clear_warnings);
            VariantOutcome::Applied {
                changed,
                export,
                saved,
                warnings,
            }
        }
        other => other,
    }
}

fn run_loaded<E: SimulationEngine + ?Sized>(
    engine: &mut E,
    model: &ModelHandle,
    kind: VariantKind,
    planned: &ParameterSet,
    opts: &SyncOptions,
) -> Result<VariantOutcome, EngineError> {
    let diffs = detect_mismatches(
        |name| match engine.read_parameter(model, name) {
            Ok(value) => value,
            Err(err) => {
                debug!(variant = %kind, parameter = name, "cannot read current value: {err}");
                None
            }
        },
        planned,
    );

    if opts.dry_run {
        info!(variant = %kind, "{} param diffs", diffs.len());
        for d in &diffs {
            info!(variant = %kind, "  {}: {:?} -> {:?}", d.name, d.current, d.planned);
        }
        return Ok(VariantOutcome::DryReported { diffs });
    }

    if diffs.is_empty() && !opts.force {
        info!(variant = %kind, "parameters already match; skipping solve");
        return Ok(VariantOutcome::Skipped);
    }

    for d in &diffs {
        engine.set_parameter(model, &d.name, &d.planned)?;
    }

    let mut warnings = Vec::new();
    settle(EngineStep::Build, kind, engine.build(model), &mut warnings)?;
    settle(EngineStep::Mesh, kind, engine.mesh(model), &mut warnings)?;
    info!(
        variant = %kind,
        "solving study {} with {} changes",
        opts.study,
        diffs.len()
    );
    settle(EngineStep::Solve, kind, engine.solve(model, &opts.study), &mut warnings)?;

    let export = export_results(engine, model, kind, opts, &mut warnings)?;

    let saved = if opts.save_solved {
        let path = solved_path(&model.path, kind);
        settle(EngineStep::Save, kind, engine.save_model(model, &path), &mut warnings)?.map(|()| {
            info!(variant = %kind, "saved {}", path.display());
            path
        })
    } else {
        None
    };

    Ok(VariantOutcome::Applied {
        changed: diffs.len(),
        export,
        saved,
        warnings,
    })
}

fn export_results<E: SimulationEngine + ?Sized>(
    engine: &mut E,
    model: &ModelHandle,
    kind: VariantKind,
    opts: &SyncOptions,
    warnings: &mut Vec<String>,
) -> Result<Option<PathBuf>, EngineError> {
    let definition = match &opts.export_name {
        Some(name) => Some(name.clone()),
        None => {
            let defs = settle(
                EngineStep::Export,
                kind,
                engine.list_export_definitions(model),
                warnings,
            )?
            .unwrap_or_default();
            pick_export(&defs).map(str::to_string)
        }
    };

    let Some(definition) = definition else {
        debug!(variant = %kind, "no export definitions available");
        return Ok(None);
    };

    let out = export_path(&model.path, kind);
    let written = settle(
        EngineStep::Export,
        kind,
        engine.export_data(model, &definition, &out),
        warnings,
    )?;
    Ok(written.map(|()| {
        info!(variant = %kind, "wrote {} via '{definition}'", out.display());
        out
    }))
}

/// First definition mentioning band/global/diag, else the first one.
pub fn pick_export(defs: &[String]) -> Option<&str> {
    defs.iter()
        .find(|d| {
            let lower = d.to_lowercase();
            PREFERRED_EXPORTS.iter().any(|tok| lower.contains(tok))
        })
        .or_else(|| defs.first())
        .map(String::as_str)
}

/// `<dir>/<stem>_<label>_band.txt`
pub fn export_path(model_path: &Path, kind: VariantKind) -> PathBuf {
    sibling(model_path, &format!("_{}_band.txt", kind.label()))
}

/// `<dir>/<stem>_<label>_solved.mph`
pub fn solved_path(model_path: &Path, kind: VariantKind) -> PathBuf {
    sibling(model_path, &format!("_{}_solved.mph", kind.label()))
}

fn sibling(model_path: &Path, suffix: &str) -> PathBuf {
    let stem = model_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    model_path.with_file_name(format!("{stem}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    use crate::engine::fake::FakeEngine;

    fn base() -> ParameterSet {
        ParameterSet::try_from_pairs([("d0", "10"), ("d17_mir", "5[nm]"), ("n_ext", "17")]).unwrap()
    }

    fn targets(dir: &TempDir, kinds: &[VariantKind]) -> Vec<VariantTarget> {
        kinds
            .iter()
            .map(|&kind| {
                let path = dir.path().join(kind.default_model_file());
                fs::write(&path, b"model").unwrap();
                VariantTarget { kind, model_path: path }
            })
            .collect()
    }

    fn in_sync_engine(kind: VariantKind) -> FakeEngine {
        let planned = compose_variant_parameters(kind, &base());
        FakeEngine {
            readable: true,
            live: planned.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ..FakeEngine::default()
        }
    }

    #[test]
    fn matching_parameters_skip_without_engine_writes() {
        let dir = TempDir::new().unwrap();
        let mut engine = in_sync_engine(VariantKind::Mirror);
        let report = synchronize(
            &mut engine,
            &base(),
            &targets(&dir, &[VariantKind::Mirror]),
            &SyncOptions::default(),
        );
        assert_eq!(report.results[0].outcome, VariantOutcome::Skipped);
        assert_eq!(engine.count("set"), 0);
        assert_eq!(engine.count("solve"), 0);
        assert_eq!(engine.count("clear"), 1);
    }

    #[test]
    fn force_solves_once_even_without_diffs() {
        let dir = TempDir::new().unwrap();
        let mut engine = in_sync_engine(VariantKind::Mirror);
        let opts = SyncOptions {
            force: true,
            ..SyncOptions::default()
        };
        let report = synchronize(&mut engine, &base(), &targets(&dir, &[VariantKind::Mirror]), &opts);
        assert!(matches!(
            report.results[0].outcome,
            VariantOutcome::Applied { changed: 0, .. }
        ));
        assert_eq!(engine.count("set"), 0);
        assert_eq!(engine.count("solve std1"), 1);
    }

    #[test]
    fn unreadable_model_applies_every_planned_parameter() {
        let dir = TempDir::new().unwrap();
        let mut engine = FakeEngine {
            exports: vec!["Data 1".into(), "Global Evaluation".into()],
            ..FakeEngine::default()
        };
        let report = synchronize(
            &mut engine,
            &base(),
            &targets(&dir, &[VariantKind::Mirror]),
            &SyncOptions::default(),
        );
        let planned = compose_variant_parameters(VariantKind::Mirror, &base());
        assert_eq!(engine.count("set"), planned.len());
        assert!(engine.calls.contains(&"set d17=5[nm]".to_string()));
        assert!(engine.calls.contains(&"export Global Evaluation".to_string()));

        let VariantOutcome::Applied { export, .. } = &report.results[0].outcome else {
            panic!("expected applied, got {:?}", report.results[0].outcome);
        };
        let export = export.as_ref().unwrap();
        assert!(export.ends_with("unit_mech_sym_mirror_mirror_band.txt"));
    }

    #[test]
    fn dry_run_reports_without_mutating() {
        let dir = TempDir::new().unwrap();
        let mut engine = FakeEngine {
            readable: true,
            ..FakeEngine::default()
        };
        engine.live.insert("n".into(), "0".into());
        let opts = SyncOptions {
            dry_run: true,
            force: true,
            ..SyncOptions::default()
        };
        let report = synchronize(&mut engine, &base(), &targets(&dir, &[VariantKind::Defect]), &opts);
        let VariantOutcome::DryReported { diffs } = &report.results[0].outcome else {
            panic!("expected dry report");
        };
        // `n` already matches for the defect variant; the rest are absent.
        assert!(diffs.iter().all(|d| d.name != "n"));
        assert_eq!(diffs.len(), base().len());
        assert_eq!(engine.count("set"), 0);
        assert_eq!(engine.count("solve"), 0);
        assert_eq!(engine.count("clear"), 1);
    }

    #[test]
    fn build_failure_is_swallowed_and_solve_still_runs() {
        let dir = TempDir::new().unwrap();
        let mut engine = FakeEngine {
            fail_build: true,
            fail_export: true,
            exports: vec!["Band Table".into()],
            ..FakeEngine::default()
        };
        let report = synchronize(
            &mut engine,
            &base(),
            &targets(&dir, &[VariantKind::Waveguide]),
            &SyncOptions::default(),
        );
        assert_eq!(engine.count("mesh"), 1);
        assert_eq!(engine.count("solve"), 1);
        let VariantOutcome::Applied { export, warnings, .. } = &report.results[0].outcome else {
            panic!("expected applied");
        };
        assert!(export.is_none());
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn solve_failure_fails_variant_and_continues() {
        let dir = TempDir::new().unwrap();
        let mut engine = FakeEngine {
            fail_solve: true,
            ..FakeEngine::default()
        };
        let report = synchronize(
            &mut engine,
            &base(),
            &targets(&dir, &[VariantKind::Mirror, VariantKind::Defect]),
            &SyncOptions::default(),
        );
        assert_eq!(report.results.len(), 2);
        for r in &report.results {
            assert!(matches!(r.outcome, VariantOutcome::Failed { .. }));
        }
        // Each model is released even though its solve failed.
        assert_eq!(engine.count("clear"), 2);
        assert_eq!(engine.count("export"), 0);
    }

    #[test]
    fn missing_model_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let mut engine = FakeEngine::default();
        let target = VariantTarget {
            kind: VariantKind::Defect,
            model_path: dir.path().join("absent.mph"),
        };
        let report = synchronize(&mut engine, &base(), &[target], &SyncOptions::default());
        assert!(matches!(report.results[0].outcome, VariantOutcome::ModelMissing { .. }));
        assert_eq!(engine.count("load"), 0);
    }

    #[test]
    fn unavailable_engine_only_plans() {
        let dir = TempDir::new().unwrap();
        let mut engine = FakeEngine {
            unavailable: true,
            ..FakeEngine::default()
        };
        let report = synchronize(
            &mut engine,
            &base(),
            &targets(&dir, &[VariantKind::Mirror, VariantKind::Defect]),
            &SyncOptions::default(),
        );
        assert!(report.report_only);
        assert!(engine.calls.is_empty());
        assert_eq!(
            report.results[1].outcome,
            VariantOutcome::Planned {
                parameters: base().len() + 1
            }
        );
    }

    #[test]
    fn save_solved_and_export_override() {
        let dir = TempDir::new().unwrap();
        let mut engine = FakeEngine {
            exports: vec!["Band Table".into()],
            ..FakeEngine::default()
        };
        let opts = SyncOptions {
            save_solved: true,
            export_name: Some("Custom".into()),
            study: "std2".into(),
            ..SyncOptions::default()
        };
        let report = synchronize(&mut engine, &base(), &targets(&dir, &[VariantKind::Waveguide]), &opts);
        assert!(engine.calls.contains(&"export Custom".to_string()));
        assert_eq!(engine.count("solve std2"), 1);
        let VariantOutcome::Applied { saved, .. } = &report.results[0].outcome else {
            panic!("expected applied");
        };
        assert!(saved.as_ref().unwrap().ends_with("unit_mech_sym_mirror_wg_wg_solved.mph"));
    }

    #[test]
    fn mesh_failure_is_swallowed_and_solve_still_runs() {
        let dir = TempDir::new().unwrap();
        let mut engine = FakeEngine {
            fail_mesh: true,
            ..FakeEngine::default()
        };
        let report = synchronize(
            &mut engine,
            &base(),
            &targets(&dir, &[VariantKind::Mirror]),
            &SyncOptions::default(),
        );
        assert_eq!(engine.count("solve"), 1);
        let VariantOutcome::Applied { warnings, .. } = &report.results[0].outcome else {
            panic!("expected applied, got {:?}", report.results[0].outcome);
        };
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("mesh failed"));
    }

    #[test]
    fn save_failure_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let mut engine = FakeEngine {
            fail_save: true,
            exports: vec!["Band Table".into()],
            ..FakeEngine::default()
        };
        let opts = SyncOptions {
            save_solved: true,
            ..SyncOptions::default()
        };
        let report = synchronize(&mut engine, &base(), &targets(&dir, &[VariantKind::Mirror]), &opts);
        assert_eq!(engine.count("save"), 1);
        assert_eq!(engine.count("clear"), 1);
        let VariantOutcome::Applied { export, saved, warnings, .. } = &report.results[0].outcome else {
            panic!("expected applied, got {:?}", report.results[0].outcome);
        };
        assert!(export.is_some());
        assert!(saved.is_none());
        assert!(warnings.iter().any(|w| w.starts_with("save failed")));
    }

    #[test]
    fn clear_failure_is_reported_without_changing_outcome() {
        let dir = TempDir::new().unwrap();
        let mut engine = FakeEngine {
            fail_clear: true,
            ..FakeEngine::default()
        };
        let report = synchronize(
            &mut engine,
            &base(),
            &targets(&dir, &[VariantKind::Mirror, VariantKind::Defect]),
            &SyncOptions::default(),
        );
        assert_eq!(engine.count("clear"), 2);
        for r in &report.results {
            let VariantOutcome::Applied { warnings, .. } = &r.outcome else {
                panic!("expected applied, got {:?}", r.outcome);
            };
            assert!(warnings.iter().any(|w| w.starts_with("clear failed")));
        }

        // A skipped variant stays skipped when its release fails.
        let mut engine = in_sync_engine(VariantKind::Mirror);
        engine.fail_clear = true;
        let report = synchronize(
            &mut engine,
            &base(),
            &targets(&dir, &[VariantKind::Mirror]),
            &SyncOptions::default(),
        );
        assert_eq!(report.results[0].outcome, VariantOutcome::Skipped);
    }

    #[test]
    fn set_failure_fails_variant_and_continues() {
        let dir = TempDir::new().unwrap();
        let mut engine = FakeEngine {
            fail_set: true,
            ..FakeEngine::default()
        };
        let report = synchronize(
            &mut engine,
            &base(),
            &targets(&dir, &[VariantKind::Mirror, VariantKind::Waveguide]),
            &SyncOptions::default(),
        );
        assert_eq!(report.results.len(), 2);
        for r in &report.results {
            let VariantOutcome::Failed { reason } = &r.outcome else {
                panic!("expected failed, got {:?}", r.outcome);
            };
            assert!(reason.contains("set_parameter"));
        }
        // The first failed write stops that variant: no solve, one set attempt each.
        assert_eq!(engine.count("set"), 2);
        assert_eq!(engine.count("solve"), 0);
        assert_eq!(engine.count("load"), 2);
        assert_eq!(engine.count("clear"), 2);
    }

    #[test]
    fn export_preference_order() {
        let defs = vec!["Data 1".to_string(), "Diag Table".to_string(), "Band".to_string()];
        assert_eq!(pick_export(&defs), Some("Diag Table"));
        let defs = vec!["Plot 1".to_string()];
        assert_eq!(pick_export(&defs), Some("Plot 1"));
        assert_eq!(pick_export(&[]), None);
    }
}
