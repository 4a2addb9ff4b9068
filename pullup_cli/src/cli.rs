//! CLI argument definitions and shared statics.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "pullup", version, about = "Pull-up phase and repetition counter")]
pub struct Cli {
    /// Path to config TOML; a missing file means built-in defaults
    #[arg(long, value_name = "FILE", default_value = "etc/pullup_config.toml")]
    pub config: PathBuf,

    /// Emit JSON lines (reports, summary, errors, logs) instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides RUST_LOG and [logging] level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Where replayed keypoints come from. Exactly one must be given.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ReplayInput {
    /// Directory of OpenPose `*_keypoints.json` files, one per video frame
    #[arg(long, value_name = "DIR")]
    pub openpose_dir: Option<PathBuf>,

    /// JSON Lines file of named-joint frames (`-` reads stdin)
    #[arg(long, value_name = "FILE")]
    pub frames: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay recorded keypoints through the classifier
    Replay {
        #[command(flatten)]
        input: ReplayInput,
        /// Print one line per frame
        #[arg(long, action = ArgAction::SetTrue)]
        per_frame: bool,
        /// Write repetition events as CSV (overrides [output] events_csv)
        #[arg(long, value_name = "FILE")]
        events_csv: Option<PathBuf>,
        /// Override the source frame rate used for timestamps
        #[arg(long, value_name = "FPS")]
        fps: Option<f64>,
    },
    /// Load and validate the config, then print the effective settings
    CheckConfig,
}
