//! Per-stream driver bundling the classifier, frame clock and event timeline.

use serde::Serialize;

use crate::config::{InputCfg, QualifierCfg};
use crate::error::Result;
use crate::frame::{KeypointFrame, Point};
use crate::phase::Phase;
use crate::qualifier::PhaseQualifier;
use crate::timeline::{EventTimeline, FrameClock, RepEvent};

/// Angles are `None` when they could not be computed on this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnglesReport {
    pub left_arm: Option<f64>,
    pub right_arm: Option<f64>,
    pub legs: Option<f64>,
    pub wrists_level: Option<f64>,
}

/// What the classifier concluded about one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame_index: u64,
    pub time_s: f64,
    pub hang: bool,
    pub phase: Phase,
    pub clean: u32,
    pub unclean: u32,
    pub chin: Option<Point>,
    pub angles: AnglesReport,
    pub event: Option<RepEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub frames: u64,
    pub hang_frames: u64,
    pub clean: u32,
    pub unclean: u32,
    pub phase: Phase,
    pub duration_s: f64,
}

#[derive(Debug)]
pub struct PullUpSession {
    qualifier: PhaseQualifier,
    clock: FrameClock,
    timeline: EventTimeline,
    frames: u64,
    hang_frames: u64,
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

impl PullUpSession {
    pub fn new(qualifier_cfg: QualifierCfg, input_cfg: &InputCfg) -> Result<Self> {
        if !input_cfg.fps.is_finite() || input_cfg.fps <= 0.0 {
            return Err(eyre::Report::new(crate::error::BuildError::InvalidConfig(
                "fps must be > 0",
            )));
        }
        Ok(Self::with_qualifier(
            PhaseQualifier::new(qualifier_cfg)?,
            FrameClock::new(input_cfg.fps),
        ))
    }

    pub fn with_qualifier(qualifier: PhaseQualifier, clock: FrameClock) -> Self {
        Self {
            qualifier,
            clock,
            timeline: EventTimeline::new(),
            frames: 0,
            hang_frames: 0,
        }
    }

    /// Feed the next frame of the stream.
    pub fn process(&mut self, frame: &KeypointFrame) -> FrameReport {
        let frame_index = self.frames;
        let time_s = self.clock.seconds_at(frame_index);
        self.frames += 1;

        let hang = self.qualifier.qualify(frame);
        if hang {
            self.hang_frames += 1;
        }
        let counters = self.qualifier.counters();
        let event = self.timeline.observe(frame_index, time_s, counters);
        let angles = self.qualifier.angles();

        FrameReport {
            frame_index,
            time_s,
            hang,
            phase: self.qualifier.phase(),
            clean: counters.clean,
            unclean: counters.unclean,
            chin: self.qualifier.chin_point(),
            angles: AnglesReport {
                left_arm: finite(angles.left_arm),
                right_arm: finite(angles.right_arm),
                legs: finite(angles.legs),
                wrists_level: angles.wrists_level.and_then(finite),
            },
            event,
        }
    }

    pub fn summary(&self) -> Summary {
        let counters = self.qualifier.counters();
        Summary {
            frames: self.frames,
            hang_frames: self.hang_frames,
            clean: counters.clean,
            unclean: counters.unclean,
            phase: self.qualifier.phase(),
            duration_s: self.clock.seconds_at(self.frames),
        }
    }

    pub fn events(&self) -> &[RepEvent] {
        self.timeline.events()
    }

    pub fn qualifier(&self) -> &PhaseQualifier {
        &self.qualifier
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames
    }
}
