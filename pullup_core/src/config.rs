//! Configuration types for the classifier.
//!
//! These are the runtime configuration structs used by `PhaseQualifier` and `PullUpSession`.
//! They are separate from the TOML-deserialized config in `pullup_config`.

/// Thresholds and ratios steering phase qualification.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifierCfg {
    /// Max elbow flexion (degrees) for an arm to count as straight. Compared with `<`.
    pub arm_angle_threshold: f64,
    /// Max angle between the thighs (degrees) for legs to count as together.
    pub leg_angle_threshold: f64,
    /// Max tilt of the wrist line from horizontal (degrees).
    pub wrists_level_angle_threshold: f64,
    /// Consecutive non-hang frames tolerated before the phase is forced to Unknown.
    pub failed_attempts_amount_threshold: u32,
    /// Fraction of the neck→nose segment at which the chin is placed. Range: (0, 1].
    pub neck_chin_ratio: f64,
    /// Fraction of the hang-time chin–wrist distance that must be climbed to open an attempt.
    pub chin_to_wrists_start_ratio: f64,
    /// Fraction of the hang-time chin–wrist distance still climbed when an attempt is closed.
    pub chin_to_wrists_finish_ratio: f64,
    /// Frames kept in each deviation trail.
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

/// Input adapter settings.
#[derive(Debug, Clone, PartialEq)]
pub struct InputCfg {
    /// Frames per second of the source video; drives event timestamps.
    pub fps: f64,
    /// Detections with confidence below this are treated as absent.
    pub confidence_threshold: f64,
}

impl Default for InputCfg {
    fn default() -> Self {
        Self {
            fps: 30.0,
            confidence_threshold: 0.1,
        }
    }
}
