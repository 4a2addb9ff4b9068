#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Pull-up phase qualification and repetition counting (detector-agnostic).
//!
//! This crate turns a stream of per-frame body keypoints into a pull-up phase
//! and clean / unclean repetition counts. Keypoint detection happens elsewhere; frames
//! arrive through `pullup_traits::FrameSource` or are handed in directly.
//!
//! ## Architecture
//!
//! - **Frames**: fixed joint vocabulary, `None` for undetected joints (`frame` module)
//! - **Geometry**: vector angles that never yield NaN (`geometry` module)
//! - **Posture**: fail-closed hang and initial-position predicates (`posture` module)
//! - **Qualifier**: the phase state machine with failure guard and deviation windows
//!   (`PhaseQualifier`)
//! - **Session**: frame clock, repetition event timeline and per-frame reports
//!   (`PullUpSession`)
//! - **Adapters**: OpenPose JSON translation and a background frame reader
//!
//! ## Coordinates
//!
//! Pixel coordinates with `y` growing downwards: "higher" on screen means a smaller `y`.

pub mod attempt;
pub mod builder;
pub mod chin;
pub mod config;
pub mod conversions;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod guard;
pub mod mocks;
pub mod openpose;
pub mod phase;
pub mod posture;
pub mod qualifier;
pub mod reader;
pub mod session;
pub mod timeline;
pub mod window;

pub use attempt::AttemptWindowBounds;
pub use builder::QualifierBuilder;
pub use config::{InputCfg, QualifierCfg};
pub use error::{BuildError, FrameError, QualifierError, Report, Result};
pub use frame::{Joint, KeypointFrame, Point};
pub use openpose::KeypointLayout;
pub use phase::{Phase, RepCounters};
pub use posture::{LimbAngles, PostureValidator};
pub use qualifier::PhaseQualifier;
pub use reader::{FrameReader, Received};
pub use session::{AnglesReport, FrameReport, PullUpSession, Summary};
pub use timeline::{EventTimeline, FrameClock, RepEvent, RepKind};
