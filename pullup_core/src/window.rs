//! Trailing displacement history used to tell a body-driven pull-up from an imitation.

use std::collections::VecDeque;

/// Bounded FIFO of absolute per-frame vertical displacements of one body part.
#[derive(Debug, Clone)]
pub struct DisplacementTrail {
    buf: VecDeque<f64>,
    cap: usize,
    prev: Option<f64>,
}

impl DisplacementTrail {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            buf: VecDeque::with_capacity(cap),
            cap,
            prev: None,
        }
    }

    /// Feed the current position. The first position after a reset only seeds `prev`.
    pub fn push_position(&mut self, y: f64) {
        if let Some(prev) = self.prev {
            self.buf.push_back((prev - y).abs());
            if self.buf.len() > self.cap {
                self.buf.pop_front();
            }
            debug_assert!(self.buf.len() <= self.cap, "displacement trail exceeded capacity");
        }
        self.prev = Some(y);
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.prev = None;
    }

    pub fn sum(&self) -> f64 {
        self.buf.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn previous(&self) -> Option<f64> {
        self.prev
    }
}

/// Paired wrist and shoulder trails sharing one history length.
#[derive(Debug, Clone)]
pub struct DeviationWindow {
    wrists: DisplacementTrail,
    shoulders: DisplacementTrail,
}

impl DeviationWindow {
    pub fn new(history_length: usize) -> Self {
        Self {
            wrists: DisplacementTrail::new(history_length),
            shoulders: DisplacementTrail::new(history_length),
        }
    }

    /// Record one frame. A missing shoulder pair leaves the shoulder trail untouched.
    pub fn record(&mut self, wrists_y: f64, shoulders_y: Option<f64>) {
        self.wrists.push_position(wrists_y);
        if let Some(y) = shoulders_y {
            self.shoulders.push_position(y);
        }
    }

    pub fn reset(&mut self) {
        self.wrists.clear();
        self.shoulders.clear();
    }

    pub fn wrists(&self) -> &DisplacementTrail {
        &self.wrists
    }

    pub fn shoulders(&self) -> &DisplacementTrail {
        &self.shoulders
    }

    /// `(wrists_sum, shoulders_sum)` over the trailing window.
    pub fn sums(&self) -> (f64, f64) {
        (self.wrists.sum(), self.shoulders.sum())
    }

    /// The torso travelled further than the hands over the window.
    pub fn shoulders_dominate(&self) -> bool {
        self.shoulders.sum() > self.wrists.sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_position_only_seeds() {
        let mut t = DisplacementTrail::new(3);
        t.push_position(100.0);
        assert!(t.is_empty());
        assert_eq!(t.previous(), Some(100.0));
        t.push_position(90.0);
        assert_eq!(t.len(), 1);
        assert_eq!(t.sum(), 10.0);
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut t = DisplacementTrail::new(2);
        for y in [0.0, 10.0, 11.0, 13.0] {
            t.push_position(y);
        }
        // deltas were 10, 1, 2; only the last two remain
        assert_eq!(t.len(), 2);
        assert_eq!(t.sum(), 3.0);
    }

    #[test]
    fn zero_position_is_a_valid_seed() {
        let mut t = DisplacementTrail::new(4);
        t.push_position(0.0);
        t.push_position(5.0);
        assert_eq!(t.sum(), 5.0);
    }

    #[test]
    fn clear_forgets_previous_position() {
        let mut t = DisplacementTrail::new(4);
        t.push_position(1.0);
        t.push_position(2.0);
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.previous(), None);
        t.push_position(50.0);
        assert!(t.is_empty());
    }

    #[test]
    fn shoulders_must_strictly_dominate() {
        let mut w = DeviationWindow::new(5);
        w.record(100.0, Some(200.0));
        w.record(95.0, Some(195.0));
        assert_eq!(w.sums(), (5.0, 5.0));
        assert!(!w.shoulders_dominate());
        w.record(95.0, Some(185.0));
        assert!(w.shoulders_dominate());
    }

    #[test]
    fn missing_shoulders_skip_the_sample() {
        let mut w = DeviationWindow::new(5);
        w.record(100.0, Some(200.0));
        w.record(100.0, None);
        w.record(100.0, Some(170.0));
        assert_eq!(w.shoulders().len(), 1);
        assert_eq!(w.shoulders().sum(), 30.0);
        assert_eq!(w.wrists().len(), 2);
    }
}
