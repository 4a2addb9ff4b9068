//! Typed keypoint frames.
//!
//! A frame maps every joint of a fixed vocabulary to either a pixel coordinate or `None`.
//! Because the mapping is an array indexed by [`Joint`], a frame built in Rust can never
//! lack a joint *key*; that contract can only be broken by an external map, and
//! [`KeypointFrame::from_named`] rejects it.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::FrameError;

/// Anatomical landmarks consumed by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Joint {
    Nose,
    Neck,
    RShoulder,
    RElbow,
    RWrist,
    LShoulder,
    LElbow,
    LWrist,
    MidHip,
    RHip,
    RKnee,
    RAnkle,
    LHip,
    LKnee,
    LAnkle,
    REar,
    LEar,
}

impl Joint {
    pub const COUNT: usize = 17;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::Nose,
        Joint::Neck,
        Joint::RShoulder,
        Joint::RElbow,
        Joint::RWrist,
        Joint::LShoulder,
        Joint::LElbow,
        Joint::LWrist,
        Joint::MidHip,
        Joint::RHip,
        Joint::RKnee,
        Joint::RAnkle,
        Joint::LHip,
        Joint::LKnee,
        Joint::LAnkle,
        Joint::REar,
        Joint::LEar,
    ];

    /// Canonical name, as used in named-joint JSON frames.
    pub fn name(self) -> &'static str {
        match self {
            Joint::Nose => "Nose",
            Joint::Neck => "Neck",
            Joint::RShoulder => "RShoulder",
            Joint::RElbow => "RElbow",
            Joint::RWrist => "RWrist",
            Joint::LShoulder => "LShoulder",
            Joint::LElbow => "LElbow",
            Joint::LWrist => "LWrist",
            Joint::MidHip => "MidHip",
            Joint::RHip => "RHip",
            Joint::RKnee => "RKnee",
            Joint::RAnkle => "RAnkle",
            Joint::LHip => "LHip",
            Joint::LKnee => "LKnee",
            Joint::LAnkle => "LAnkle",
            Joint::REar => "REar",
            Joint::LEar => "LEar",
        }
    }

    pub fn from_name(name: &str) -> Option<Joint> {
        Joint::ALL.into_iter().find(|j| j.name() == name)
    }

    /// Position of this joint in the OpenPose BODY_25 keypoint layout.
    pub fn body25_index(self) -> usize {
        match self {
            Joint::REar => 17,
            Joint::LEar => 18,
            other => other as usize,
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pixel coordinate; `y` grows downwards, so a smaller `y` is visually higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn xf(self) -> f64 {
        f64::from(self.x)
    }

    #[inline]
    pub fn yf(self) -> f64 {
        f64::from(self.y)
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

impl From<[u32; 2]> for Point {
    fn from([x, y]: [u32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [u32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Keypoints of one video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "BTreeMap<String, Option<Point>>")]
pub struct KeypointFrame {
    points: [Option<Point>; Joint::COUNT],
}

impl KeypointFrame {
    /// Frame with every joint undetected.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, joint: Joint, point: impl Into<Point>) -> Self {
        self.points[joint.slot()] = Some(point.into());
        self
    }

    /// Builder-style removal.
    pub fn without(mut self, joint: Joint) -> Self {
        self.points[joint.slot()] = None;
        self
    }

    pub fn set(&mut self, joint: Joint, point: Option<Point>) {
        self.points[joint.slot()] = point;
    }

    #[inline]
    pub fn get(&self, joint: Joint) -> Option<Point> {
        self.points[joint.slot()]
    }

    /// Detected joints in vocabulary order.
    pub fn present(&self) -> impl Iterator<Item = (Joint, Point)> + '_ {
        Joint::ALL
            .into_iter()
            .filter_map(|j| self.get(j).map(|p| (j, p)))
    }

    pub fn detected_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    /// Build a frame from an external name → coordinate map.
    ///
    /// Every joint of the vocabulary must appear as a key (mapped to `None` when undetected).
    /// Names outside the vocabulary are ignored.
    pub fn from_named<'a, I>(entries: I) -> Result<Self, FrameError>
    where
        I: IntoIterator<Item = (&'a str, Option<Point>)>,
    {
        let mut frame = Self::default();
        let mut seen = [false; Joint::COUNT];
        for (name, point) in entries {
            match Joint::from_name(name) {
                Some(joint) => {
                    seen[joint.slot()] = true;
                    frame.points[joint.slot()] = point;
                }
                None => tracing::trace!(name, "ignoring joint outside vocabulary"),
            }
        }
        if let Some(missing) = Joint::ALL.into_iter().find(|j| !seen[j.slot()]) {
            return Err(FrameError::MissingJoint(missing));
        }
        Ok(frame)
    }
}

impl TryFrom<BTreeMap<String, Option<Point>>> for KeypointFrame {
    type Error = FrameError;

    fn try_from(map: BTreeMap<String, Option<Point>>) -> Result<Self, Self::Error> {
        Self::from_named(map.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

impl Serialize for KeypointFrame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Joint::COUNT))?;
        for joint in Joint::ALL {
            map.serialize_entry(joint.name(), &self.get(joint))?;
        }
        map.end()
    }
}
