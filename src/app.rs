//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - resolves configuration (env, `.env`, flags)
//! - runs the profile / sync / inspect / crossing workflows
//! - prints reports and plots

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, CrossingArgs, EngineArgs, InspectArgs, ParamsArgs, ProfileArgs, SyncArgs};
use crate::config::AppConfig;
use crate::domain::SyncOptions;
use crate::engine::HttpEngine;
use crate::error::{AppError, EngineError};

pub mod pipeline;

/// Entry point for the `taper` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Profile(args) => handle_profile(args),
        Command::Sync(args) => handle_sync(args),
        Command::Inspect(args) => handle_inspect(args),
        Command::Crossing(args) => handle_crossing(args),
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests, embedding) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_profile(args: ProfileArgs) -> Result<(), AppError> {
    let mut config = config_from_args(&args.params, None);
    if let Some(url) = &args.engine_url {
        config.engine_url = Some(url.clone());
    }
    let base = match crate::io::read_params_json(&config.params_json) {
        Ok(params) => params,
        Err(err) => {
            let Some(model) = &args.model else {
                return Err(err);
            };
            warn!("{err}; reading parameters from {}", model.display());
            let mut engine = connect(&config)?;
            pipeline::params_from_model(&mut engine, model)?
        }
    };

    let overrides = pipeline::ProfileOverrides {
        wg_cell_w_1: Some(args.wg_cell_w_1.clone()),
        n_ext: args.n_ext,
        d0: args.d0,
        h0: args.h0,
        delx: args.delx,
        m: args.m,
    };
    let run = pipeline::run_profile(&base, &overrides)?;

    crate::io::write_params_json(&args.out_json, &run.params)?;
    info!("wrote {}", args.out_json.display());
    crate::io::write_profile_csv(&args.out_csv, &run.rows)?;
    info!("wrote {} ({} rows)", args.out_csv.display(), run.rows.len());

    if args.table {
        println!("{}", crate::report::format_profile(&run.spec, &run.rows));
    }
    if args.plot {
        println!("{}", crate::plot::render_profile_plot(&run.rows, args.width, args.height));
    }
    Ok(())
}

fn handle_sync(args: SyncArgs) -> Result<(), AppError> {
    let config = config_from_args(&args.params, Some(&args.engine));
    let base = crate::io::read_params_json(&config.params_json)?;
    let targets = config.targets(&args.engine.which.variants());

    let opts = SyncOptions {
        force: args.force,
        dry_run: args.dry_run,
        study: args.study.clone().unwrap_or_else(|| config.study.clone()),
        export_name: args.export_name.clone(),
        save_solved: args.save_solved,
    };

    let report = match connect(&config) {
        Ok(mut engine) => crate::sync::synchronize(&mut engine, &base, &targets, &opts),
        Err(err) => crate::sync::plan_only(&base, &targets, &opts, err),
    };
    print!("{}", crate::report::format_sync_report(&report));
    Ok(())
}

fn handle_inspect(args: InspectArgs) -> Result<(), AppError> {
    let config = config_from_args(&ParamsArgs { params: None }, Some(&args.engine));
    let targets = config.targets(&args.engine.which.variants());

    let mut engine = connect(&config)?;
    let read = pipeline::inspect_models(&mut engine, &targets, args.save_json)?;
    if read < targets.len() {
        warn!("read parameters from {read} of {} models", targets.len());
    }
    Ok(())
}

fn handle_crossing(args: CrossingArgs) -> Result<(), AppError> {
    let points = crate::io::read_crossing_csv(&args.csv)?;
    let analysis = crate::crossing::analyze_crossing(points)?;

    println!("{}", crate::report::format_crossing(&analysis));
    if args.plot {
        let series: Vec<(f64, f64)> = analysis
            .points
            .iter()
            .zip(&analysis.split_mhz)
            .map(|(p, &s)| (p.period_nm, s))
            .collect();
        println!(
            "{}",
            crate::plot::render_series_plot("split MHz vs period nm", &series, 'o', args.width, args.height)
        );
    }
    if let Some(path) = &args.export {
        crate::io::write_split_csv(path, &analysis)?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

/// Environment config with CLI flags applied on top.
pub fn config_from_args(params: &ParamsArgs, engine: Option<&EngineArgs>) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(path) = &params.params {
        config.params_json = path.clone();
    }
    if let Some(engine) = engine {
        if let Some(dir) = &engine.model_dir {
            config.model_dir = dir.clone();
        }
        if let Some(url) = &engine.engine_url {
            config.engine_url = Some(url.clone());
        }
    }
    config
}

fn connect(config: &AppConfig) -> Result<HttpEngine, EngineError> {
    let url = config
        .engine_url
        .as_deref()
        .ok_or_else(|| EngineError::Unavailable("no engine URL configured (set TAPER_ENGINE_URL)".into()))?;
    HttpEngine::new(url)
}
