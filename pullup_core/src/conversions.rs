//! `From` implementations bridging `pullup_config` types to `pullup_core` types.

use crate::config::{InputCfg, QualifierCfg};
use crate::openpose::KeypointLayout;

// ── QualifierCfg ─────────────────────────────────────────────────────────────

impl From<&pullup_config::QualifierCfg> for QualifierCfg {
    fn from(c: &pullup_config::QualifierCfg) -> Self {
        Self {
            arm_angle_threshold: c.arm_angle_threshold,
            leg_angle_threshold: c.leg_angle_threshold,
            wrists_level_angle_threshold: c.wrists_level_angle_threshold,
            failed_attempts_amount_threshold: c.failed_attempts_amount_threshold,
            neck_chin_ratio: c.neck_chin_ratio,
            chin_to_wrists_start_ratio: c.chin_to_wrists_start_ratio,
            chin_to_wrists_finish_ratio: c.chin_to_wrists_finish_ratio,
            deviation_history_length: c.deviation_history_length,
        }
    }
}

// ── InputCfg ─────────────────────────────────────────────────────────────────

impl From<&pullup_config::InputCfg> for InputCfg {
    fn from(c: &pullup_config::InputCfg) -> Self {
        Self {
            fps: c.fps,
            confidence_threshold: c.confidence_threshold,
        }
    }
}

// ── KeypointLayout ───────────────────────────────────────────────────────────

impl From<pullup_config::Layout> for KeypointLayout {
    fn from(l: pullup_config::Layout) -> Self {
        match l {
            pullup_config::Layout::Body25 => KeypointLayout::Body25,
            pullup_config::Layout::Coco => KeypointLayout::Coco,
        }
    }
}
