//! Chin–wrist distance boundaries for detecting partial (unclean) attempts.

/// Start and finish boundaries of an unclean attempt, in pixels of chin–wrist distance.
///
/// Fixed when the athlete enters the hang and kept until the next hang.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptWindowBounds {
    /// An attempt opens once the distance drops to this value or below.
    pub start: f64,
    /// An open attempt completes once the distance grows past this value.
    pub finish: f64,
}

impl AttemptWindowBounds {
    /// Bounds that never let an attempt complete.
    pub const UNBOUNDED: Self = Self {
        start: f64::INFINITY,
        finish: f64::INFINITY,
    };

    /// Derive bounds from the chin–wrist distance measured at the hang.
    ///
    /// A missing or zero distance yields [`Self::UNBOUNDED`].
    pub fn from_hang_distance(distance: Option<f64>, start_ratio: f64, finish_ratio: f64) -> Self {
        match distance {
            Some(d) if d != 0.0 && d.is_finite() => Self {
                start: d * (1.0 - start_ratio),
                finish: d * (1.0 - finish_ratio),
            },
            _ => Self::UNBOUNDED,
        }
    }

    #[inline]
    pub fn opens_at(&self, distance: f64) -> bool {
        distance <= self.start
    }

    #[inline]
    pub fn completes_at(&self, distance: f64) -> bool {
        distance > self.finish
    }
}

impl Default for AttemptWindowBounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}
