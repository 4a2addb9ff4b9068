//! Test and helper mocks for pullup_core

use crate::frame::{Joint, KeypointFrame};

/// Synthetic front-facing athlete on a bar whose wrists sit at `y = 100`, `x = 70 / 130`.
///
/// `rise` lifts every joint below the wrists by that many pixels; `bend` pushes the elbows
/// outward, flexing both arms. `rise` must stay below 80 so the elbows remain under the wrists.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticPose {
    pub rise: u32,
    pub bend: u32,
    pub with_legs: bool,
}

impl SyntheticPose {
    pub const WRIST_Y: u32 = 100;

    /// Straight-arm dead hang.
    pub fn hang() -> Self {
        Self {
            rise: 0,
            bend: 0,
            with_legs: true,
        }
    }

    pub fn pulled(rise: u32, bend: u32) -> Self {
        Self {
            rise,
            bend,
            with_legs: true,
        }
    }

    /// Chin–wrist distance of a dead hang with `neck_chin_ratio = 0.5`.
    pub const HANG_CHIN_DISTANCE: f64 = 65.0;

    pub fn frame(self) -> KeypointFrame {
        let r = self.rise.min(79);
        let shoulder_y = 180 - r;
        let elbow_y = (Self::WRIST_Y + shoulder_y) / 2;
        let f = KeypointFrame::empty()
            .with(Joint::LWrist, (130, Self::WRIST_Y))
            .with(Joint::RWrist, (70, Self::WRIST_Y))
            .with(Joint::LElbow, (130 + self.bend, elbow_y))
            .with(Joint::RElbow, (70 - self.bend.min(70), elbow_y))
            .with(Joint::LShoulder, (130, shoulder_y))
            .with(Joint::RShoulder, (70, shoulder_y))
            .with(Joint::Neck, (100, 180 - r))
            .with(Joint::Nose, (100, 150 - r))
            .with(Joint::LEar, (108, 150 - r))
            .with(Joint::REar, (92, 150 - r));
        if !self.with_legs {
            return f;
        }
        f.with(Joint::MidHip, (100, 300 - r))
            .with(Joint::LHip, (110, 300 - r))
            .with(Joint::RHip, (90, 300 - r))
            .with(Joint::LKnee, (110, 380 - r))
            .with(Joint::RKnee, (90, 380 - r))
            .with(Joint::LAnkle, (110, 460 - r))
            .with(Joint::RAnkle, (90, 460 - r))
    }
}

/// Frames of one full body-driven repetition, starting and ending in a dead hang.
pub fn clean_rep() -> Vec<KeypointFrame> {
    let mut v = vec![SyntheticPose::hang().frame(); 3];
    v.extend((0..=70).step_by(10).map(|r| SyntheticPose::pulled(r, 20).frame()));
    v.extend((0..=40).rev().step_by(10).map(|r| SyntheticPose::pulled(r, 20).frame()));
    v.push(SyntheticPose::hang().frame());
    v
}

/// Frames of a partial repetition: the chin climbs most of the way, never reaches the bar,
/// and drops back before the arms straighten.
pub fn unclean_rep() -> Vec<KeypointFrame> {
    let mut v = vec![SyntheticPose::hang().frame(); 3];
    v.extend([0, 10, 30, 50, 30, 5].map(|r| SyntheticPose::pulled(r, 20).frame()));
    v.push(SyntheticPose::hang().frame());
    v
}
