//! Command-line parsing for the taper/variant tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! taper math and the engine synchronization.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::VariantSelection;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "taper", version, about = "Taper profile generator and variant parameter sync")]
pub struct Cli {
    /// Log debug detail (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize the canonical parameter file and write the d/h taper profile.
    Profile(ProfileArgs),
    /// Push canonical parameters into the variant models and re-solve where needed.
    Sync(SyncArgs),
    /// Print the parameters currently stored in the variant models.
    Inspect(InspectArgs),
    /// Find the minimum splitting of an avoided-crossing sweep.
    Crossing(CrossingArgs),
}

/// Options shared by commands that read the canonical parameter file.
#[derive(Debug, Args, Clone)]
pub struct ParamsArgs {
    /// Canonical parameter JSON (default: $TAPER_PARAMS_JSON or final_dimensions.json).
    #[arg(long, value_name = "JSON")]
    pub params: Option<PathBuf>,
}

/// Options shared by commands that talk to the engine.
#[derive(Debug, Args, Clone)]
pub struct EngineArgs {
    /// Directory holding the variant model files (default: $TAPER_MODEL_DIR or `.`).
    #[arg(long, value_name = "DIR")]
    pub model_dir: Option<PathBuf>,

    /// Engine bridge URL (default: $TAPER_ENGINE_URL).
    #[arg(long, value_name = "URL")]
    pub engine_url: Option<String>,

    /// Which variant models to process: all, mirror, defect, wg (aliases such as
    /// mirror_wg or mirror_defect accepted, any case).
    #[arg(long, default_value = "all")]
    pub which: VariantSelection,
}

#[derive(Debug, Args, Clone)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub params: ParamsArgs,

    /// Model to read parameters from when the parameter JSON is missing or unreadable.
    #[arg(long, value_name = "MPH")]
    pub model: Option<PathBuf>,

    /// Engine bridge URL used with `--model` (default: $TAPER_ENGINE_URL).
    #[arg(long, value_name = "URL")]
    pub engine_url: Option<String>,

    /// Value stored for wg_Cell_w_1 in the saved JSON.
    #[arg(long = "set-wg-cell-w-1", default_value = "1241[nm]")]
    pub wg_cell_w_1: String,

    /// Output JSON (authoritative, key-sorted copy of the parameters).
    #[arg(long, default_value = "final_dimensions.json")]
    pub out_json: PathBuf,

    /// Output profile CSV (`index,d,h`).
    #[arg(long, default_value = "geometry_profile.csv")]
    pub out_csv: PathBuf,

    /// Override the taper half-width N.
    #[arg(long)]
    pub n_ext: Option<u32>,

    /// Override the center d.
    #[arg(long)]
    pub d0: Option<f64>,

    /// Override the center h.
    #[arg(long)]
    pub h0: Option<f64>,

    /// Override the decay length.
    #[arg(long)]
    pub delx: Option<f64>,

    /// Override the decay order.
    #[arg(long = "m")]
    pub m: Option<f64>,

    /// Print the profile table.
    #[arg(long)]
    pub table: bool,

    /// Render ASCII plots of d(n) and h(n).
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct SyncArgs {
    #[command(flatten)]
    pub params: ParamsArgs,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Study tag to solve (default: $TAPER_STUDY or std1).
    #[arg(long)]
    pub study: Option<String>,

    /// Update and solve even if no parameter differs.
    #[arg(long)]
    pub force: bool,

    /// Only print the planned changes; do not modify or solve.
    #[arg(long)]
    pub dry_run: bool,

    /// Export definition to use instead of the automatic pick.
    #[arg(long)]
    pub export_name: Option<String>,

    /// Save a solved copy of each model next to its exports.
    #[arg(long)]
    pub save_solved: bool,
}

#[derive(Debug, Args, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Also write `<model>_parameters.json` next to each model.
    #[arg(long)]
    pub save_json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct CrossingArgs {
    /// Sweep CSV with period / electromechanical / optomechanical columns.
    #[arg(default_value = "avoided_crossing_data.csv")]
    pub csv: PathBuf,

    /// Write `period_nm,em_ghz,om_ghz,split_mhz` to this CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Render an ASCII plot of the splitting vs period.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}
