//! Adapter from OpenPose JSON output to [`KeypointFrame`].
//!
//! OpenPose writes one document per video frame:
//! `{"people": [{"pose_keypoints_2d": [x0, y0, c0, x1, y1, c1, ...]}, ...]}`.
//! Only the first person is used. Undetected joints come out as `(0, 0)` with zero
//! confidence; this adapter maps them, and anything below the confidence threshold, to `None`.

use std::str::FromStr;

use serde::Deserialize;

use crate::error::FrameError;
use crate::frame::{Joint, KeypointFrame, Point};

/// Keypoint ordering of the pose model that produced the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeypointLayout {
    /// 25-point body model (OpenPose default).
    #[default]
    Body25,
    /// 18-point COCO model. Has no mid-hip landmark.
    Coco,
}

impl KeypointLayout {
    /// Index of `joint` in the flattened keypoint array, in triples.
    pub fn index_of(self, joint: Joint) -> Option<usize> {
        match self {
            KeypointLayout::Body25 => Some(joint.body25_index()),
            KeypointLayout::Coco => match joint {
                Joint::MidHip => None,
                Joint::RHip => Some(8),
                Joint::RKnee => Some(9),
                Joint::RAnkle => Some(10),
                Joint::LHip => Some(11),
                Joint::LKnee => Some(12),
                Joint::LAnkle => Some(13),
                Joint::REar => Some(16),
                Joint::LEar => Some(17),
                // Nose..LWrist share indices 0..=7 with BODY_25.
                other => Some(other.body25_index()),
            },
        }
    }

    /// Minimum number of values a keypoint array must hold.
    pub fn required_len(self) -> usize {
        let max = Joint::ALL
            .into_iter()
            .filter_map(|j| self.index_of(j))
            .max()
            .unwrap_or(0);
        (max + 1) * 3
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KeypointLayout::Body25 => "body25",
            KeypointLayout::Coco => "coco",
        }
    }
}

impl FromStr for KeypointLayout {
    type Err = FrameError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "body25" | "body_25" => Ok(KeypointLayout::Body25),
            "coco" => Ok(KeypointLayout::Coco),
            other => Err(FrameError::Malformed(format!("unknown keypoint layout '{other}'"))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenPoseDocument {
    #[serde(default)]
    people: Vec<OpenPosePerson>,
}

#[derive(Debug, Deserialize)]
struct OpenPosePerson {
    #[serde(default)]
    pose_keypoints_2d: Vec<f64>,
}

/// Translate one person's flattened `[x, y, confidence]` triples.
///
/// Coordinates are truncated towards zero. A joint whose truncated position is `(0, 0)` or
/// whose confidence is below `confidence_threshold` is undetected.
pub fn frame_from_keypoints(
    values: &[f64],
    layout: KeypointLayout,
    confidence_threshold: f64,
) -> core::result::Result<KeypointFrame, FrameError> {
    let expected = layout.required_len();
    if values.len() < expected {
        return Err(FrameError::TruncatedKeypoints {
            expected,
            got: values.len(),
        });
    }

    let mut frame = KeypointFrame::empty();
    for joint in Joint::ALL {
        let Some(idx) = layout.index_of(joint) else {
            continue;
        };
        let (x, y, c) = (values[idx * 3], values[idx * 3 + 1], values[idx * 3 + 2]);
        if !c.is_finite() || c < confidence_threshold {
            continue;
        }
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return Err(FrameError::InvalidCoordinate { joint, x, y });
        }
        let (xt, yt) = (x.trunc(), y.trunc());
        if xt > f64::from(u32::MAX) || yt > f64::from(u32::MAX) {
            return Err(FrameError::InvalidCoordinate { joint, x, y });
        }
        // Range-checked above.
        let point = Point::new(xt as u32, yt as u32);
        if point != Point::new(0, 0) {
            frame.set(joint, Some(point));
        }
    }
    Ok(frame)
}

/// BODY_25 shorthand for [`frame_from_keypoints`].
pub fn frame_from_body25(
    values: &[f64],
    confidence_threshold: f64,
) -> core::result::Result<KeypointFrame, FrameError> {
    frame_from_keypoints(values, KeypointLayout::Body25, confidence_threshold)
}

/// Parse one OpenPose JSON document.
///
/// Returns `Ok(None)` when nobody was detected in the frame.
pub fn parse_document(
    json: &str,
    layout: KeypointLayout,
    confidence_threshold: f64,
) -> core::result::Result<Option<KeypointFrame>, FrameError> {
    let doc: OpenPoseDocument =
        serde_json::from_str(json).map_err(|e| FrameError::Malformed(e.to_string()))?;
    match doc.people.first() {
        Some(person) => {
            frame_from_keypoints(&person.pose_keypoints_2d, layout, confidence_threshold).map(Some)
        }
        None => Ok(None),
    }
}
