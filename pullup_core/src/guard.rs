//! Consecutive-failure guard for hang detection.

/// Counts consecutive frames on which the hang could not be confirmed.
///
/// A streak longer than `threshold` trips the guard. The counter keeps growing while the
/// streak lasts, so the guard stays tripped until the next confirmed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureGuard {
    threshold: u32,
    failures: u32,
}

impl FailureGuard {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            failures: 0,
        }
    }

    /// Record a failed frame; returns `true` when the streak exceeds the threshold.
    pub fn record_failure(&mut self) -> bool {
        self.failures = self.failures.saturating_add(1);
        self.tripped()
    }

    pub fn record_success(&mut self) {
        self.failures = 0;
    }

    #[inline]
    pub fn tripped(&self) -> bool {
        self.failures > self.threshold
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}
