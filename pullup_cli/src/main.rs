mod cli;
mod error_fmt;
mod replay;
mod sources;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::replay::{ReplayOptions, run_replay};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn main() {
    if let Err(e) = run() {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

/// `--log-level` wins over RUST_LOG, which wins over `[logging] level`.
fn resolve_level(cli: &Cli, logging: &pullup_config::Logging) -> String {
    if let Some(l) = &cli.log_level {
        return l.clone();
    }
    if let Ok(env) = std::env::var("RUST_LOG")
        && !env.trim().is_empty()
    {
        return env;
    }
    logging.level.clone().unwrap_or_else(|| "info".to_string())
}

fn file_layer(path: &Path, rotation: Option<&str>) -> eyre::Result<(BoxedLayer, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| eyre::eyre!("logging.file has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("failed to create log directory {}", dir.display()))?;
    let appender = match rotation.unwrap_or("never") {
        "daily" => tracing_appender::rolling::daily(dir, name),
        "hourly" => tracing_appender::rolling::hourly(dir, name),
        _ => tracing_appender::rolling::never(dir, name),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(writer)
        .boxed();
    Ok((layer, guard))
}

/// The returned guard flushes the log file when dropped; hold it until exit.
fn init_tracing(cli: &Cli, logging: &pullup_config::Logging) -> eyre::Result<Option<WorkerGuard>> {
    let level = resolve_level(cli, logging);
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if cli.json {
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .boxed(),
        );
    } else {
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .boxed(),
        );
    }
    let mut guard = None;
    if let Some(file) = &logging.file {
        let (layer, g) = file_layer(Path::new(file), logging.rotation.as_deref())?;
        layers.push(layer);
        guard = Some(g);
    }

    // A subscriber may already be set (e.g. under test harnesses); keep going.
    let _ = tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init();
    Ok(guard)
}

fn run() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    let cfg = pullup_config::load_file(&cli.config)?;
    cfg.validate().wrap_err("invalid configuration")?;
    let _log_guard = init_tracing(&cli, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    match &cli.cmd {
        Commands::Replay {
            input,
            per_frame,
            events_csv,
            fps,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                .wrap_err("failed to install Ctrl-C handler")?;
            let opts = ReplayOptions {
                per_frame: *per_frame,
                json: cli.json,
                events_csv: events_csv.clone(),
                fps: *fps,
            };
            let summary = run_replay(&cfg, input, &opts, shutdown)?;
            tracing::info!(
                clean = summary.clean,
                unclean = summary.unclean,
                frames = summary.frames,
                "replay finished"
            );
        }
        Commands::CheckConfig => {
            // Building the qualifier runs the same range checks a replay would.
            pullup_core::PhaseQualifier::new((&cfg.qualifier).into())?;
            if cli.json {
                println!("{}", serde_json::json!({ "ok": true, "config": cfg }));
            } else {
                print!("{}", toml::to_string_pretty(&cfg)?);
            }
        }
    }
    Ok(())
}
