//! Binary entry path: argument handling, logging, runtime construction,
//! and run orchestration (load config, validate, dispatch, report).
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::args::BarrageArgs;
use crate::config::types::StressConfig;
use crate::config::{load_config, validate};
use crate::dispatch;
use crate::error::{AppError, AppResult};
use crate::shutdown;
use crate::sinks;
use crate::summary::SummaryCollector;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Default config filenames checked when no CLI args are provided.
const DEFAULT_CONFIG_FILES: [&str; 2] = ["barrage.toml", "barrage.json"];
/// Backpressure bound on the outcome stream between workers and the
/// summary collector.
const OUTCOME_CHANNEL_CAPACITY: usize = 1024;

/// # Errors
///
/// Returns an error when argument parsing, configuration, or the run
/// itself fails.
pub fn run() -> AppResult<()> {
    let args = match parse_args()? {
        Some(args) => args,
        None => return Ok(()),
    };

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<Option<BarrageArgs>> {
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        let mut cmd = BarrageArgs::command();
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = BarrageArgs::command().get_matches_from(raw_args);
    Ok(Some(BarrageArgs::from_arg_matches(&matches)?))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(args: BarrageArgs) -> AppResult<()> {
    let config = resolve_config(&args)?;

    // Hard gate: no traffic until the whole configuration checks out.
    validate(&config).map_err(AppError::validation)?;

    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(None)?);
    let (stop_tx, stop_rx) = shutdown::stop_channel();
    let signal_handle = shutdown::spawn_signal_handler(stop_tx.clone());
    let cap_handle = args
        .duration_cap
        .map(|cap| shutdown::spawn_duration_cap(stop_tx.clone(), cap));

    let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);
    let target_urls: Vec<String> = config
        .targets
        .iter()
        .map(|target| target.url.clone())
        .collect();
    let collector_handle = tokio::spawn(SummaryCollector::collect(target_urls, outcome_rx));

    info!("Dispatching {} target(s).", config.targets.len());
    let started = tokio::time::Instant::now();
    dispatch::run_all(&config, transport, outcome_tx, stop_rx).await;
    let duration = started.elapsed();

    signal_handle.abort();
    if let Some(handle) = cap_handle {
        handle.abort();
    }
    drop(stop_tx);

    let report = collector_handle.await?.finish(duration);
    for line in report.lines() {
        println!("{line}");
    }
    if let Some(path) = args.output_json.as_deref() {
        sinks::write_json_report(Path::new(path), &report)?;
        info!("Wrote JSON report to {}.", path);
    }

    Ok(())
}

fn resolve_config(args: &BarrageArgs) -> AppResult<StressConfig> {
    if let Some(config) = load_config(args.config.as_deref())? {
        if !args.urls.is_empty() {
            warn!("Targets come from the config file; ignoring positional URLs.");
        }
        return Ok(config);
    }
    Ok(StressConfig {
        targets: args.to_targets(),
    })
}
