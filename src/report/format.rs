//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the taper/sync code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use std::path::Path;

use crate::crossing::CrossingAnalysis;
use crate::domain::{ParameterDiff, ProfileRow, VariantOutcome};
use crate::sync::SyncReport;
use crate::taper::TaperSpec;

/// Taper inputs followed by the `index, d, h` table.
pub fn format_profile(spec: &TaperSpec, rows: &[ProfileRow]) -> String {
    let mut out = String::new();
    out.push_str("=== taper profile ===\n");
    out.push_str(&format!(
        "N={} | delx={} | M={}\n",
        spec.half_width, spec.d.decay_length, spec.d.decay_order
    ));
    out.push_str(&format!(
        "d: center={} left={} right={}\n",
        spec.d.center, spec.d.left, spec.d.right
    ));
    out.push_str(&format!(
        "h: center={} left={} right={}\n\n",
        spec.h.center, spec.h.left, spec.h.right
    ));

    out.push_str(&format!("{:>6} {:>14} {:>14}\n", "index", "d", "h"));
    out.push_str(&format!("{:->6} {:->14} {:->14}\n", "", "", ""));
    for r in rows {
        out.push_str(&format!("{:>6} {:>14.6} {:>14.6}\n", r.index, r.d, r.h));
    }
    out
}

/// Per-variant outcome summary of a sync pass.
pub fn format_sync_report(report: &SyncReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== variant sync ({}) ===\n",
        report.started.format("%Y-%m-%d %H:%M:%S")
    ));
    if let Some(reason) = &report.unavailable_reason {
        out.push_str(&format!("Engine unavailable ({reason}); report only.\n"));
    }

    for r in &report.results {
        let tag = r.outcome.tag();
        let kind = r.kind.label();
        match &r.outcome {
            VariantOutcome::Planned { parameters } => {
                out.push_str(&format!("[{tag}] {kind}: would set {parameters} parameters\n"));
            }
            VariantOutcome::DryReported { diffs } => {
                out.push_str(&format!("[{tag}] {kind}: {} param diffs\n", diffs.len()));
                out.push_str(&format_diffs(diffs));
            }
            VariantOutcome::Skipped => {
                out.push_str(&format!("[{tag}] {kind}: parameters already match; skipped solve\n"));
            }
            VariantOutcome::Applied {
                changed,
                export,
                saved,
                warnings,
            } => {
                out.push_str(&format!("[{tag}] {kind}: solved with {changed} changes\n"));
                if let Some(path) = export {
                    out.push_str(&format!("   export: {}\n", path.display()));
                }
                if let Some(path) = saved {
                    out.push_str(&format!("   saved : {}\n", path.display()));
                }
                for w in warnings {
                    out.push_str(&format!("   warn  : {w}\n"));
                }
            }
            VariantOutcome::ModelMissing { path } => {
                out.push_str(&format!("[{tag}] {kind}: model not found: {}\n", path.display()));
            }
            VariantOutcome::Failed { reason } => {
                out.push_str(&format!("[{tag}] {kind}: {reason}\n"));
            }
        }
    }
    out
}

/// `   - name: 'current' -> 'planned'` lines.
pub fn format_diffs(diffs: &[ParameterDiff]) -> String {
    let mut out = String::new();
    for d in diffs {
        let current = d
            .current
            .as_deref()
            .map(|c| format!("'{c}'"))
            .unwrap_or_else(|| "<unknown>".to_string());
        out.push_str(&format!("   - {}: {current} -> '{}'\n", d.name, d.planned));
    }
    out
}

/// Parameter listing for one model, sorted case-insensitively.
pub fn format_parameters(label: &str, model_path: &Path, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by_key(|(k, _)| k.to_lowercase());

    let file = model_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut out = format!("[{label}] {file} - {} parameters\n", params.len());
    for (k, v) in sorted {
        out.push_str(&format!("  {k} = {v}\n"));
    }
    out
}

/// Minimum-splitting summary of an avoided-crossing sweep.
pub fn format_crossing(analysis: &CrossingAnalysis) -> String {
    let mut out = String::new();
    out.push_str("=== avoided crossing ===\n");
    out.push_str(&format!(
        "Points: n={} | period=[{:.1}, {:.1}] nm\n",
        analysis.points.len(),
        analysis.points.first().map(|p| p.period_nm).unwrap_or(f64::NAN),
        analysis.points.last().map(|p| p.period_nm).unwrap_or(f64::NAN),
    ));
    out.push_str(&format!(
        "min Δf ≈ {:.3} MHz (g ≈ {:.3} MHz) at {:.0} nm\n",
        analysis.min_split_mhz, analysis.coupling_mhz, analysis.min_period_nm
    ));
    out
}
