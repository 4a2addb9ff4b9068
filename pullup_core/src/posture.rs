//! Posture predicates over a single keypoint frame.
//!
//! Every predicate fails closed: a joint that is not detected can never make a check pass,
//! with one exception. Legs outside the frame are assumed together, otherwise an athlete
//! filmed from the waist up would never be seen hanging.
//!
//! Angle sentinels:
//! - arm angle `+inf` when any joint of the arm is missing (or the arm is degenerate),
//! - legs angle `-inf` when the legs are not visible, `+inf` when a thigh has zero length.

use crate::frame::{Joint, KeypointFrame, Point};
use crate::geometry::{angle_between, angle_between_three_points, mean_y, vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// `(wrist, elbow, shoulder)` for this side.
    fn arm(self) -> (Joint, Joint, Joint) {
        match self {
            Side::Left => (Joint::LWrist, Joint::LElbow, Joint::LShoulder),
            Side::Right => (Joint::RWrist, Joint::RElbow, Joint::RShoulder),
        }
    }
}

/// Flexion angle of one arm at the elbow; 0° is fully straight.
pub fn arm_angle(frame: &KeypointFrame, side: Side) -> f64 {
    let (w, e, s) = side.arm();
    match (frame.get(w), frame.get(e), frame.get(s)) {
        (Some(wrist), Some(elbow), Some(shoulder)) => {
            angle_between_three_points(wrist, elbow, shoulder).unwrap_or(f64::INFINITY)
        }
        _ => f64::INFINITY,
    }
}

/// Angle between the two hip→knee vectors.
pub fn legs_angle(frame: &KeypointFrame) -> f64 {
    match (
        frame.get(Joint::LHip),
        frame.get(Joint::LKnee),
        frame.get(Joint::RHip),
        frame.get(Joint::RKnee),
    ) {
        (Some(lh), Some(lk), Some(rh), Some(rk)) => {
            angle_between(vector(lh, lk), vector(rh, rk)).unwrap_or(f64::INFINITY)
        }
        _ => f64::NEG_INFINITY,
    }
}

/// Inclination of the wrist-to-wrist line from horizontal, in degrees.
///
/// `None` when a wrist is missing or both wrists share the same x.
pub fn wrists_level_angle(frame: &KeypointFrame) -> Option<f64> {
    let (l, r) = wrists(frame)?;
    let dx = l.xf() - r.xf();
    if dx == 0.0 {
        return None;
    }
    let dy = l.yf() - r.yf();
    Some((dy.abs() / dx.abs()).atan().to_degrees())
}

pub fn wrists_higher_than_elbows(frame: &KeypointFrame) -> bool {
    match (
        frame.get(Joint::LWrist),
        frame.get(Joint::RWrist),
        frame.get(Joint::LElbow),
        frame.get(Joint::RElbow),
    ) {
        (Some(lw), Some(rw), Some(le), Some(re)) => lw.y < le.y && rw.y < re.y,
        _ => false,
    }
}

/// Both wrists strictly above every other detected joint.
pub fn wrists_over_body(frame: &KeypointFrame) -> bool {
    let Some((l, r)) = wrists(frame) else {
        return false;
    };
    let highest_other = frame
        .present()
        .filter(|(j, _)| !matches!(j, Joint::LWrist | Joint::RWrist))
        .map(|(_, p)| p.y)
        .min();
    match highest_other {
        Some(top) => l.y < top && r.y < top,
        None => false,
    }
}

pub fn head_between_wrists(frame: &KeypointFrame, chin: Option<Point>) -> bool {
    let (Some((l, r)), Some(chin)) = (wrists(frame), chin) else {
        return false;
    };
    let (lo, hi) = (l.x.min(r.x), l.x.max(r.x));
    lo < chin.x && chin.x < hi
}

/// Chin at or above the average wrist height.
pub fn is_chin_over_wrists_level(frame: &KeypointFrame, chin: Option<Point>) -> bool {
    match (wrists(frame), chin) {
        (Some((l, r)), Some(chin)) => chin.yf() <= mean_y(l, r),
        _ => false,
    }
}

/// Signed vertical distance `chin.y - mean(wrist.y)`; positive while the chin is below the wrists.
pub fn chin_to_wrists_distance(frame: &KeypointFrame, chin: Option<Point>) -> Option<f64> {
    let (l, r) = wrists(frame)?;
    Some(chin?.yf() - mean_y(l, r))
}

#[inline]
fn wrists(frame: &KeypointFrame) -> Option<(Point, Point)> {
    Some((frame.get(Joint::LWrist)?, frame.get(Joint::RWrist)?))
}

/// Angles computed for one frame, exposed for debug overlays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbAngles {
    pub left_arm: f64,
    pub right_arm: f64,
    pub legs: f64,
    pub wrists_level: Option<f64>,
}

impl LimbAngles {
    pub fn measure(frame: &KeypointFrame) -> Self {
        Self {
            left_arm: arm_angle(frame, Side::Left),
            right_arm: arm_angle(frame, Side::Right),
            legs: legs_angle(frame),
            wrists_level: wrists_level_angle(frame),
        }
    }
}

impl Default for LimbAngles {
    fn default() -> Self {
        Self {
            left_arm: f64::INFINITY,
            right_arm: f64::INFINITY,
            legs: f64::NEG_INFINITY,
            wrists_level: None,
        }
    }
}

/// Individual outcomes of the hang plausibility test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HangCheck {
    pub wrists_same_level: bool,
    pub wrists_higher_than_elbows: bool,
    pub head_between_wrists: bool,
    pub legs_together: bool,
}

impl HangCheck {
    #[inline]
    pub fn passed(&self) -> bool {
        self.wrists_same_level
            && self.wrists_higher_than_elbows
            && self.head_between_wrists
            && self.legs_together
    }
}

/// Threshold-dependent predicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureValidator {
    pub arm_angle_threshold: f64,
    pub leg_angle_threshold: f64,
    pub wrists_level_angle_threshold: f64,
}

impl PostureValidator {
    /// Both arms strictly below the arm threshold.
    pub fn arms_straight(&self, frame: &KeypointFrame) -> bool {
        arm_angle(frame, Side::Left) < self.arm_angle_threshold
            && arm_angle(frame, Side::Right) < self.arm_angle_threshold
    }

    pub fn wrists_same_level(&self, frame: &KeypointFrame) -> bool {
        wrists_level_angle(frame).is_some_and(|a| a <= self.wrists_level_angle_threshold)
    }

    pub fn legs_together(&self, frame: &KeypointFrame) -> bool {
        legs_angle(frame) <= self.leg_angle_threshold
    }

    pub fn hang_check(&self, frame: &KeypointFrame, chin: Option<Point>) -> HangCheck {
        HangCheck {
            wrists_same_level: self.wrists_same_level(frame),
            wrists_higher_than_elbows: wrists_higher_than_elbows(frame),
            head_between_wrists: head_between_wrists(frame, chin),
            legs_together: self.legs_together(frame),
        }
    }

    pub fn is_there_hang(&self, frame: &KeypointFrame, chin: Option<Point>) -> bool {
        self.hang_check(frame, chin).passed()
    }

    /// Hanging at the bottom on straight arms.
    pub fn is_there_initial_position(&self, frame: &KeypointFrame) -> bool {
        self.arms_straight(frame) && wrists_over_body(frame)
    }
}
