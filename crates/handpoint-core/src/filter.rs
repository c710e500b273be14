//! Moving-average motion filter.

use crate::Position;
use std::collections::VecDeque;

/// Keeps the last `capacity` raw samples and reports their mean.
///
/// Averaging ~10 frames costs a few frames of lag but removes most of the
/// frame-to-frame landmark jitter.
#[derive(Debug, Clone)]
pub struct MotionFilter {
    history: VecDeque<Position>,
    capacity: usize,
}

impl MotionFilter {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a raw sample and return the updated filtered target.
    pub fn observe(&mut self, raw: Position) -> Position {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(raw);
        self.mean()
    }

    fn mean(&self) -> Position {
        let n = self.history.len() as f64;
        let (sx, sy) = self
            .history
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Position::new(sx / n, sy / n)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_recent_window() {
        let mut filter = MotionFilter::new(3);
        let xs = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];

        for (k, x) in xs.iter().enumerate() {
            let target = filter.observe(Position::new(*x, -*x));
            let start = (k + 1).saturating_sub(3);
            let window = &xs[start..=k];
            let expected = window.iter().sum::<f64>() / window.len() as f64;
            assert!((target.x - expected).abs() < 1e-9, "step {k}");
            assert!((target.y + expected).abs() < 1e-9, "step {k}");
            assert!(filter.len() <= filter.capacity());
        }
        assert_eq!(filter.len(), 3);
    }

    #[test]
    fn test_first_sample_passes_through() {
        let mut filter = MotionFilter::new(10);
        assert_eq!(filter.observe(Position::new(5.0, 7.0)), Position::new(5.0, 7.0));
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut filter = MotionFilter::new(0);
        assert_eq!(filter.capacity(), 1);
        filter.observe(Position::new(1.0, 1.0));
        assert_eq!(filter.observe(Position::new(3.0, 3.0)), Position::new(3.0, 3.0));
    }

    #[test]
    fn test_clear() {
        let mut filter = MotionFilter::new(4);
        filter.observe(Position::new(1.0, 1.0));
        filter.clear();
        assert!(filter.is_empty());
        assert_eq!(filter.observe(Position::new(9.0, 9.0)), Position::new(9.0, 9.0));
    }
}
