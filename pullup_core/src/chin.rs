//! Chin estimation.
//!
//! Pose models expose no chin landmark, so the chin is placed on the neck→nose segment
//! at a configured fraction. When the nose is not detected (athlete facing away) the
//! midpoint of the two ears stands in for it.

use crate::frame::{Joint, KeypointFrame, Point};
use crate::geometry::midpoint;

/// Estimate the chin for one frame.
///
/// Requires `Neck` and either `Nose` or both ears. Offsets are truncated toward zero,
/// so the result always lies between the neck and the (possibly synthetic) nose.
pub fn estimate_chin(frame: &KeypointFrame, neck_chin_ratio: f64) -> Option<Point> {
    let neck = frame.get(Joint::Neck)?;
    let (nose_x, nose_y) = match frame.get(Joint::Nose) {
        Some(nose) => (nose.xf(), nose.yf()),
        None => midpoint(frame.get(Joint::LEar)?, frame.get(Joint::REar)?),
    };
    let x = offset_along(neck.xf(), nose_x, neck_chin_ratio);
    let y = offset_along(neck.yf(), nose_y, neck_chin_ratio);
    Some(Point::new(x, y))
}

#[inline]
fn offset_along(from: f64, to: f64, ratio: f64) -> u32 {
    let v = from + ((to - from) * ratio).trunc();
    // from and to are both non-negative pixel coordinates and ratio is in (0, 1]
    v.max(0.0) as u32
}
