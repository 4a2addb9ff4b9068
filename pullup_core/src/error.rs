use thiserror::Error;

use crate::frame::Joint;

/// Construction-time configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

/// Keypoint adapter contract violations.
///
/// A joint that is merely undetected is `None` in the frame and never produces one of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("keypoint frame is missing joint key {0}")]
    MissingJoint(Joint),
    #[error("keypoint array too short: expected at least {expected} values, got {got}")]
    TruncatedKeypoints { expected: usize, got: usize },
    #[error("invalid coordinate for {joint}: ({x}, {y})")]
    InvalidCoordinate { joint: Joint, x: f64, y: f64 },
    #[error("malformed keypoint document: {0}")]
    Malformed(String),
}

/// Failures surfaced while driving a classifier from a frame source.
#[derive(Debug, Error, Clone)]
pub enum QualifierError {
    #[error("frame source error: {0}")]
    Source(String),
    #[error("frame reader disconnected")]
    Disconnected,
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
