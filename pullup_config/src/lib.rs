#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the pull-up counter.
//!
//! - `Config` and its sections are deserialized from TOML; every section and key is optional
//!   and falls back to the documented default.
//! - `Config::validate()` rejects values the classifier cannot work with, naming the key.
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QualifierCfg {
    /// Max elbow flexion (degrees) for a straight arm.
    pub arm_angle_threshold: f64,
    /// Max angle between thighs (degrees) for legs held together.
    pub leg_angle_threshold: f64,
    /// Max tilt of the wrist line (degrees).
    pub wrists_level_angle_threshold: f64,
    /// Consecutive rejected frames tolerated before tracking is considered lost.
    pub failed_attempts_amount_threshold: u32,
    /// Chin position along the neck→nose segment, (0, 1].
    pub neck_chin_ratio: f64,
    pub chin_to_wrists_start_ratio: f64,
    pub chin_to_wrists_finish_ratio: f64,
    /// Frames of wrist/shoulder displacement history.
    pub deviation_history_length: usize,
}

impl Default for QualifierCfg {
    fn default() -> Self {
        Self {
            arm_angle_threshold: 30.0,
            leg_angle_threshold: 30.0,
            wrists_level_angle_threshold: 5.0,
            failed_attempts_amount_threshold: 5,
            neck_chin_ratio: 0.5,
            chin_to_wrists_start_ratio: 0.7,
            chin_to_wrists_finish_ratio: 0.1,
            deviation_history_length: 20,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    #[serde(alias = "body_25")]
    Body25,
    Coco,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputCfg {
    /// Frame rate of the source video; used for event timestamps.
    pub fps: f64,
    /// OpenPose detections below this confidence are treated as undetected.
    pub confidence_threshold: f64,
    /// Keypoint ordering of OpenPose output.
    pub layout: Layout,
}

impl Default for InputCfg {
    fn default() -> Self {
        Self {
            fps: 30.0,
            confidence_threshold: 0.1,
            layout: Layout::Body25,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputCfg {
    /// Write the repetition event timeline here as CSV.
    pub events_csv: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub qualifier: QualifierCfg,
    pub input: InputCfg,
    pub logging: Logging,
    pub output: OutputCfg,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file. A missing file yields the defaults.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    match std::fs::read_to_string(path) {
        Ok(s) => load_toml(&s)
            .map_err(|e| eyre::eyre!("failed to parse config {}: {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(eyre::eyre!("failed to read config {}: {e}", path.display())),
    }
}

fn check_angle(value: f64, key: &str) -> eyre::Result<()> {
    if !(value.is_finite() && value > 0.0 && value <= 180.0) {
        eyre::bail!("{key} must be in (0, 180]");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Qualifier
        let q = &self.qualifier;
        check_angle(q.arm_angle_threshold, "qualifier.arm_angle_threshold")?;
        check_angle(q.leg_angle_threshold, "qualifier.leg_angle_threshold")?;
        check_angle(
            q.wrists_level_angle_threshold,
            "qualifier.wrists_level_angle_threshold",
        )?;
        if q.failed_attempts_amount_threshold == 0 {
            eyre::bail!("qualifier.failed_attempts_amount_threshold must be >= 1");
        }
        if !(q.neck_chin_ratio.is_finite() && q.neck_chin_ratio > 0.0 && q.neck_chin_ratio <= 1.0)
        {
            eyre::bail!("qualifier.neck_chin_ratio must be in (0, 1]");
        }
        for (value, key) in [
            (q.chin_to_wrists_start_ratio, "qualifier.chin_to_wrists_start_ratio"),
            (q.chin_to_wrists_finish_ratio, "qualifier.chin_to_wrists_finish_ratio"),
        ] {
            if !(value.is_finite() && value > 0.0 && value < 1.0) {
                eyre::bail!("{key} must be in (0, 1)");
            }
        }
        if q.chin_to_wrists_finish_ratio >= q.chin_to_wrists_start_ratio {
            eyre::bail!(
                "qualifier.chin_to_wrists_finish_ratio must be < qualifier.chin_to_wrists_start_ratio"
            );
        }
        if q.deviation_history_length == 0 {
            eyre::bail!("qualifier.deviation_history_length must be >= 1");
        }

        // Input
        if !(self.input.fps.is_finite() && self.input.fps > 0.0) {
            eyre::bail!("input.fps must be > 0");
        }
        if !(0.0..=1.0).contains(&self.input.confidence_threshold) {
            eyre::bail!("input.confidence_threshold must be in [0.0, 1.0]");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }
        if let Some(level) = self.logging.level.as_deref()
            && level.trim().is_empty()
        {
            eyre::bail!("logging.level must not be empty");
        }

        // Output
        if let Some(path) = self.output.events_csv.as_deref()
            && path.trim().is_empty()
        {
            eyre::bail!("output.events_csv must not be empty");
        }
        Ok(())
    }
}
