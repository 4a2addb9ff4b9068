//! Builder and validation for `PhaseQualifier`.
//!
//! All parameters start from `QualifierCfg::default()`; every setter overrides one of them.
//! Validation happens once in `build()`, so a misconfigured classifier can never be observed.

use crate::attempt::AttemptWindowBounds;
use crate::config::QualifierCfg;
use crate::error::{BuildError, Result};
use crate::guard::FailureGuard;
use crate::phase::{Phase, RepCounters};
use crate::posture::{LimbAngles, PostureValidator};
use crate::qualifier::PhaseQualifier;
use crate::window::DeviationWindow;

/// Builder for `PhaseQualifier`.
#[derive(Debug, Clone, Default)]
pub struct QualifierBuilder {
    cfg: QualifierCfg,
}

impl QualifierBuilder {
    pub fn from_cfg(cfg: QualifierCfg) -> Self {
        Self { cfg }
    }

    pub fn with_arm_angle_threshold(mut self, degrees: f64) -> Self {
        self.cfg.arm_angle_threshold = degrees;
        self
    }

    pub fn with_leg_angle_threshold(mut self, degrees: f64) -> Self {
        self.cfg.leg_angle_threshold = degrees;
        self
    }

    pub fn with_wrists_level_angle_threshold(mut self, degrees: f64) -> Self {
        self.cfg.wrists_level_angle_threshold = degrees;
        self
    }

    pub fn with_failed_attempts_threshold(mut self, frames: u32) -> Self {
        self.cfg.failed_attempts_amount_threshold = frames;
        self
    }

    pub fn with_neck_chin_ratio(mut self, ratio: f64) -> Self {
        self.cfg.neck_chin_ratio = ratio;
        self
    }

    pub fn with_attempt_ratios(mut self, start: f64, finish: f64) -> Self {
        self.cfg.chin_to_wrists_start_ratio = start;
        self.cfg.chin_to_wrists_finish_ratio = finish;
        self
    }

    pub fn with_deviation_history_length(mut self, frames: usize) -> Self {
        self.cfg.deviation_history_length = frames;
        self
    }

    /// Validate and construct.
    pub fn build(self) -> Result<PhaseQualifier> {
        validate(&self.cfg).map_err(eyre::Report::new)?;
        let cfg = self.cfg;
        Ok(PhaseQualifier {
            validator: PostureValidator {
                arm_angle_threshold: cfg.arm_angle_threshold,
                leg_angle_threshold: cfg.leg_angle_threshold,
                wrists_level_angle_threshold: cfg.wrists_level_angle_threshold,
            },
            phase: Phase::Unknown,
            guard: FailureGuard::new(cfg.failed_attempts_amount_threshold),
            deviations: DeviationWindow::new(cfg.deviation_history_length),
            bounds: AttemptWindowBounds::UNBOUNDED,
            attempt_open: false,
            counters: RepCounters::default(),
            chin: None,
            angles: LimbAngles::default(),
            cfg,
        })
    }
}

/// Reject configurations that would make a predicate meaningless.
pub fn validate(cfg: &QualifierCfg) -> core::result::Result<(), BuildError> {
    let angle_ok = |a: f64| a.is_finite() && a > 0.0 && a <= 180.0;
    if !angle_ok(cfg.arm_angle_threshold) {
        return Err(BuildError::InvalidConfig(
            "arm_angle_threshold must be in (0, 180]",
        ));
    }
    if !angle_ok(cfg.leg_angle_threshold) {
        return Err(BuildError::InvalidConfig(
            "leg_angle_threshold must be in (0, 180]",
        ));
    }
    if !angle_ok(cfg.wrists_level_angle_threshold) {
        return Err(BuildError::InvalidConfig(
            "wrists_level_angle_threshold must be in (0, 180]",
        ));
    }
    if cfg.failed_attempts_amount_threshold == 0 {
        return Err(BuildError::InvalidConfig(
            "failed_attempts_amount_threshold must be >= 1",
        ));
    }
    if !cfg.neck_chin_ratio.is_finite() || cfg.neck_chin_ratio <= 0.0 || cfg.neck_chin_ratio > 1.0
    {
        return Err(BuildError::InvalidConfig("neck_chin_ratio must be in (0, 1]"));
    }
    let ratio_ok = |r: f64| r.is_finite() && r > 0.0 && r < 1.0;
    if !ratio_ok(cfg.chin_to_wrists_start_ratio) {
        return Err(BuildError::InvalidConfig(
            "chin_to_wrists_start_ratio must be in (0, 1)",
        ));
    }
    if !ratio_ok(cfg.chin_to_wrists_finish_ratio) {
        return Err(BuildError::InvalidConfig(
            "chin_to_wrists_finish_ratio must be in (0, 1)",
        ));
    }
    if cfg.chin_to_wrists_finish_ratio >= cfg.chin_to_wrists_start_ratio {
        return Err(BuildError::InvalidConfig(
            "chin_to_wrists_finish_ratio must be < chin_to_wrists_start_ratio",
        ));
    }
    if cfg.deviation_history_length == 0 {
        return Err(BuildError::InvalidConfig(
            "deviation_history_length must be >= 1",
        ));
    }
    Ok(())
}
