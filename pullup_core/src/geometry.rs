//! Planar vector and angle helpers in pixel space.

use crate::frame::Point;

/// 2D vector with floating-point components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// `a - b`, componentwise.
#[inline]
pub fn vector(a: Point, b: Point) -> Vec2 {
    Vec2::new(a.xf() - b.xf(), a.yf() - b.yf())
}

/// Unsigned angle between two vectors in degrees, within `[0, 180]`.
///
/// The cosine is clamped to `[-1, 1]` before `acos`. Returns `None` when either
/// vector has zero length, since the angle is undefined.
pub fn angle_between(v1: Vec2, v2: Vec2) -> Option<f64> {
    let denom = v1.norm() * v2.norm();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    let cos = (v1.dot(v2) / denom).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Angle at `b` measured between the vectors `a - b` and `b - c`.
///
/// For a limb `wrist, elbow, shoulder` this is 0° when fully extended.
pub fn angle_between_three_points(a: Point, b: Point, c: Point) -> Option<f64> {
    angle_between(vector(a, b), vector(b, c))
}

#[inline]
pub fn midpoint(a: Point, b: Point) -> (f64, f64) {
    ((a.xf() + b.xf()) / 2.0, (a.yf() + b.yf()) / 2.0)
}

/// Mean of two vertical coordinates.
#[inline]
pub fn mean_y(a: Point, b: Point) -> f64 {
    (a.yf() + b.yf()) / 2.0
}
