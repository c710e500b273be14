//! Rate and jitter gate for backend position sync.

use std::time::{Duration, Instant};

/// Decides whether a normalized position is worth forwarding.
#[derive(Debug, Clone)]
pub struct SyncThrottle {
    interval: Duration,
    jitter_threshold: f64,
    last_sent: Option<(f64, f64)>,
    last_sent_at: Option<Instant>,
}

impl SyncThrottle {
    pub fn new(interval: Duration, jitter_threshold: f64) -> Self {
        Self {
            interval,
            jitter_threshold,
            last_sent: None,
            last_sent_at: None,
        }
    }

    /// Returns the position to forward, or `None` when either gate drops it.
    /// State only changes when a position is forwarded.
    pub fn maybe_forward(&mut self, x: f64, y: f64, now: Instant) -> Option<(f64, f64)> {
        if let Some(at) = self.last_sent_at {
            if now.saturating_duration_since(at) < self.interval {
                return None;
            }
        }

        if let Some((lx, ly)) = self.last_sent {
            let dx = (x - lx).abs();
            let dy = (y - ly).abs();
            if dx < self.jitter_threshold && dy < self.jitter_threshold {
                return None;
            }
        }

        self.last_sent = Some((x, y));
        self.last_sent_at = Some(now);
        Some((x, y))
    }

    pub fn last_sent(&self) -> Option<(f64, f64)> {
        self.last_sent
    }

    pub fn reset(&mut self) {
        self.last_sent = None;
        self.last_sent_at = None;
    }
}
