//! Frame clock and repetition event timeline.
//!
//! Downstream renderers and audio cues key off the moment a counter moves, not the counters
//! themselves. `EventTimeline` turns successive counter snapshots into discrete events.

use serde::Serialize;

use crate::phase::RepCounters;

/// Converts frame indices into stream time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    fps: f64,
}

impl FrameClock {
    /// `fps` must be finite and positive; anything else yields a clock stuck at zero.
    pub fn new(fps: f64) -> Self {
        Self { fps }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    #[inline]
    pub fn seconds_at(&self, frame_index: u64) -> f64 {
        if self.fps.is_finite() && self.fps > 0.0 {
            frame_index as f64 / self.fps
        } else {
            0.0
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(30.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepKind {
    Clean,
    Unclean,
}

impl RepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RepKind::Clean => "clean",
            RepKind::Unclean => "unclean",
        }
    }
}

/// One counted repetition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RepEvent {
    pub kind: RepKind,
    pub frame_index: u64,
    pub time_s: f64,
    pub clean_total: u32,
    pub unclean_total: u32,
}

/// Ordered record of repetition events.
#[derive(Debug, Clone, Default)]
pub struct EventTimeline {
    last: RepCounters,
    events: Vec<RepEvent>,
}

impl EventTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `counters` against the previous observation and record what changed.
    ///
    /// The classifier moves at most one counter per frame, so at most one event is produced.
    /// Clean takes precedence if a caller skips frames and both counters moved.
    pub fn observe(
        &mut self,
        frame_index: u64,
        time_s: f64,
        counters: RepCounters,
    ) -> Option<RepEvent> {
        let kind = if counters.clean > self.last.clean {
            RepKind::Clean
        } else if counters.unclean > self.last.unclean {
            RepKind::Unclean
        } else {
            self.last = counters;
            return None;
        };
        self.last = counters;
        let event = RepEvent {
            kind,
            frame_index,
            time_s,
            clean_total: counters.clean,
            unclean_total: counters.unclean,
        };
        self.events.push(event);
        Some(event)
    }

    pub fn events(&self) -> &[RepEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
