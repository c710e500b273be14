//! Per-tick cursor interpolation and hover tracking.

use crate::Position;
use serde::{Deserialize, Serialize};

/// Two-stage smoother advanced once per display tick.
///
/// Stage one moves `current` a fixed fraction toward the target, stage two is
/// an exponential moving average over `current`. The result never overshoots a
/// step change and keeps moving while no new target arrives.
#[derive(Debug, Clone)]
pub struct RenderInterpolator {
    current: Position,
    smooth: Position,
    target: Position,
    lerp_amount: f64,
    smoothing: f64,
}

impl RenderInterpolator {
    /// `smoothing` is the weight kept from the previous smoothed value.
    pub fn new(start: Position, lerp_amount: f64, smoothing: f64) -> Self {
        Self {
            current: start,
            smooth: start,
            target: start,
            lerp_amount,
            smoothing,
        }
    }

    pub fn set_target(&mut self, target: Position) {
        self.target = target;
    }

    /// Advance one tick, returning the position to display.
    pub fn advance(&mut self) -> Position {
        self.current.x += (self.target.x - self.current.x) * self.lerp_amount;
        self.current.y += (self.target.y - self.current.y) * self.lerp_amount;

        let keep = self.smoothing;
        self.smooth.x = self.smooth.x * keep + self.current.x * (1.0 - keep);
        self.smooth.y = self.smooth.y * keep + self.current.y * (1.0 - keep);

        self.smooth
    }

    /// Jump everything to `pos`.
    pub fn reset(&mut self, pos: Position) {
        self.current = pos;
        self.smooth = pos;
        self.target = pos;
    }

    pub fn current(&self) -> Position {
        self.current
    }

    pub fn smoothed(&self) -> Position {
        self.smooth
    }

    pub fn target(&self) -> Position {
        self.target
    }
}

/// Named hoverable rectangle on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverTarget {
    pub id: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl HoverTarget {
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.left
            && pos.x < self.left + self.width
            && pos.y >= self.top
            && pos.y < self.top + self.height
    }
}

/// Tracks which target, if any, is under the cursor. At most one target is
/// hovered at a time; later targets are stacked above earlier ones.
#[derive(Debug, Clone, Default)]
pub struct HoverTracker {
    targets: Vec<HoverTarget>,
    hovered: Option<usize>,
}

impl HoverTracker {
    pub fn new(targets: Vec<HoverTarget>) -> Self {
        Self {
            targets,
            hovered: None,
        }
    }

    /// Re-evaluate the hover for `pos`. Returns `Some(new_hover)` only when
    /// the hovered target changed.
    pub fn update(&mut self, pos: Position) -> Option<Option<&str>> {
        let next = self.targets.iter().rposition(|t| t.contains(pos));
        if next == self.hovered {
            return None;
        }
        self.hovered = next;
        Some(next.map(|i| self.targets[i].id.as_str()))
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.map(|i| self.targets[i].id.as_str())
    }

    pub fn clear(&mut self) {
        self.hovered = None;
    }
}
