//! The phase qualification state machine (`PhaseQualifier`).
//!
//! Each call to [`PhaseQualifier::qualify`] consumes one frame:
//! chin estimation, hang plausibility filtering with a consecutive-failure guard,
//! per-phase transition handling, deviation tracking and repetition counting.

use crate::attempt::AttemptWindowBounds;
use crate::builder::QualifierBuilder;
use crate::chin::estimate_chin;
use crate::config::QualifierCfg;
use crate::error::Result;
use crate::frame::{Joint, KeypointFrame, Point};
use crate::geometry::mean_y;
use crate::guard::FailureGuard;
use crate::phase::{Phase, RepCounters};
use crate::posture::{
    LimbAngles, PostureValidator, chin_to_wrists_distance, is_chin_over_wrists_level,
};
use crate::window::DeviationWindow;

/// Stateful classifier for one video stream.
pub struct PhaseQualifier {
    pub(crate) cfg: QualifierCfg,
    pub(crate) validator: PostureValidator,

    pub(crate) phase: Phase,
    pub(crate) guard: FailureGuard,
    pub(crate) deviations: DeviationWindow,
    pub(crate) bounds: AttemptWindowBounds,
    pub(crate) attempt_open: bool,
    pub(crate) counters: RepCounters,
    pub(crate) chin: Option<Point>,
    pub(crate) angles: LimbAngles,
}

impl core::fmt::Debug for PhaseQualifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PhaseQualifier")
            .field("phase", &self.phase)
            .field("clean", &self.counters.clean)
            .field("unclean", &self.counters.unclean)
            .field("failed_frames", &self.guard.failures())
            .field("attempt_open", &self.attempt_open)
            .finish()
    }
}

impl PhaseQualifier {
    /// Start building a qualifier from defaults.
    pub fn builder() -> QualifierBuilder {
        QualifierBuilder::default()
    }

    /// Validate `cfg` and construct a qualifier in the Unknown phase.
    pub fn new(cfg: QualifierCfg) -> Result<Self> {
        QualifierBuilder::from_cfg(cfg).build()
    }

    /// Process one frame.
    ///
    /// Returns `true` when the hang was confirmed and the phase handler ran, `false` when the
    /// frame was rejected. Rejections never touch the phase unless the failure streak exceeds
    /// the configured threshold, in which case the phase is forced to Unknown.
    pub fn qualify(&mut self, frame: &KeypointFrame) -> bool {
        self.chin = estimate_chin(frame, self.cfg.neck_chin_ratio);
        self.angles = LimbAngles::measure(frame);

        let hang = self.validator.hang_check(frame, self.chin);
        if !hang.passed() {
            tracing::trace!(?hang, failures = self.guard.failures() + 1, "hang not confirmed");
            if self.guard.record_failure() && self.phase != Phase::Unknown {
                tracing::warn!(
                    from = %self.phase,
                    failures = self.guard.failures(),
                    "tracking lost; forcing unknown phase"
                );
                self.phase = Phase::Unknown;
            }
            return false;
        }

        self.guard.record_success();
        match self.phase {
            Phase::Unknown => self.on_unknown(frame),
            Phase::Beginning => self.on_beginning(frame),
            Phase::Pulling => self.on_pulling(frame),
            Phase::Chinning => self.on_chinning(frame),
            Phase::Lowering => self.on_lowering(frame),
        }
        true
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clean_repeats(&self) -> u32 {
        self.counters.clean
    }

    pub fn unclean_repeats(&self) -> u32 {
        self.counters.unclean
    }

    pub fn counters(&self) -> RepCounters {
        self.counters
    }

    /// Chin estimated on the last frame.
    pub fn chin_point(&self) -> Option<Point> {
        self.chin
    }

    /// Elbow flexion of the left arm on the last frame; `+inf` when unknown.
    pub fn left_arm_angle(&self) -> f64 {
        self.angles.left_arm
    }

    /// Elbow flexion of the right arm on the last frame; `+inf` when unknown.
    pub fn right_arm_angle(&self) -> f64 {
        self.angles.right_arm
    }

    /// Angle between the thighs on the last frame; `-inf` when the legs were not visible.
    pub fn legs_angle(&self) -> f64 {
        self.angles.legs
    }

    pub fn wrists_level_angle(&self) -> Option<f64> {
        self.angles.wrists_level
    }

    pub fn angles(&self) -> LimbAngles {
        self.angles
    }

    /// Length of the current streak of rejected frames.
    pub fn failed_frames(&self) -> u32 {
        self.guard.failures()
    }

    pub fn attempt_open(&self) -> bool {
        self.attempt_open
    }

    pub fn attempt_bounds(&self) -> AttemptWindowBounds {
        self.bounds
    }

    /// `(wrists_sum, shoulders_sum)` of the trailing deviation window.
    pub fn deviation_sums(&self) -> (f64, f64) {
        self.deviations.sums()
    }

    pub fn cfg(&self) -> &QualifierCfg {
        &self.cfg
    }

    // ── Private: phase handlers ──────────────────────────────────────────────

    fn on_unknown(&mut self, frame: &KeypointFrame) {
        if self.validator.is_there_initial_position(frame) {
            self.enter_beginning(frame);
        }
    }

    fn on_beginning(&mut self, frame: &KeypointFrame) {
        if !self.validator.arms_straight(frame) {
            self.transition(Phase::Pulling);
        }
    }

    fn on_pulling(&mut self, frame: &KeypointFrame) {
        self.update_deviations(frame);

        if is_chin_over_wrists_level(frame, self.chin) {
            if self.deviations.shoulders_dominate() {
                self.count_clean();
                self.transition(Phase::Chinning);
            } else {
                let (wrists, shoulders) = self.deviations.sums();
                tracing::debug!(wrists, shoulders, "chin over wrists without torso lift; not counted");
            }
        } else if self.validator.is_there_initial_position(frame) {
            self.enter_beginning(frame);
        } else {
            self.track_attempt(frame);
        }
    }

    fn on_chinning(&mut self, frame: &KeypointFrame) {
        if !is_chin_over_wrists_level(frame, self.chin) {
            self.transition(Phase::Lowering);
        }
    }

    fn on_lowering(&mut self, frame: &KeypointFrame) {
        if self.validator.is_there_initial_position(frame) {
            self.enter_beginning(frame);
        }
    }

    // ── Private: shared state updates ────────────────────────────────────────

    fn enter_beginning(&mut self, frame: &KeypointFrame) {
        self.deviations.reset();
        // An attempt opened against the previous bounds must not complete against the new ones.
        if self.attempt_open {
            tracing::debug!("open attempt abandoned at the hang");
            self.attempt_open = false;
        }
        self.bounds = AttemptWindowBounds::from_hang_distance(
            chin_to_wrists_distance(frame, self.chin),
            self.cfg.chin_to_wrists_start_ratio,
            self.cfg.chin_to_wrists_finish_ratio,
        );
        tracing::trace!(start = self.bounds.start, finish = self.bounds.finish, "attempt bounds");
        self.transition(Phase::Beginning);
    }

    fn update_deviations(&mut self, frame: &KeypointFrame) {
        let (Some(lw), Some(rw)) = (frame.get(Joint::LWrist), frame.get(Joint::RWrist)) else {
            return;
        };
        let shoulders_y = match (frame.get(Joint::LShoulder), frame.get(Joint::RShoulder)) {
            (Some(ls), Some(rs)) => Some(mean_y(ls, rs)),
            _ => None,
        };
        self.deviations.record(mean_y(lw, rw), shoulders_y);
    }

    fn track_attempt(&mut self, frame: &KeypointFrame) {
        let Some(distance) = chin_to_wrists_distance(frame, self.chin) else {
            return;
        };
        if !self.attempt_open {
            self.attempt_open = self.bounds.opens_at(distance);
            if self.attempt_open {
                tracing::debug!(distance, start = self.bounds.start, "unclean attempt opened");
            }
        } else if self.bounds.completes_at(distance) && self.deviations.shoulders_dominate() {
            self.count_unclean();
            self.transition(Phase::Lowering);
        }
    }

    fn count_clean(&mut self) {
        self.counters.clean = self.counters.clean.saturating_add(1);
        self.attempt_open = false;
        tracing::info!(
            kind = "clean",
            clean = self.counters.clean,
            unclean = self.counters.unclean,
            "repetition counted"
        );
    }

    fn count_unclean(&mut self) {
        self.counters.unclean = self.counters.unclean.saturating_add(1);
        self.attempt_open = false;
        tracing::info!(
            kind = "unclean",
            clean = self.counters.clean,
            unclean = self.counters.unclean,
            "repetition counted"
        );
    }

    fn transition(&mut self, to: Phase) {
        if self.phase != to {
            tracing::debug!(from = %self.phase, to = %to, "phase transition");
        }
        self.phase = to;
    }
}
