//! Destination surface geometry.

use crate::{Landmark, Position};
use serde::{Deserialize, Serialize};

/// Pixel rectangle that pointer positions are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Surface {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl Surface {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Map a camera-space landmark onto the surface. The x axis is mirrored
    /// so moving the hand right moves the pointer right.
    pub fn project(&self, landmark: Landmark) -> Position {
        Position {
            x: self.left + (1.0 - landmark.x) * self.width,
            y: self.top + landmark.y * self.height,
        }
    }

    /// Surface pixels back to 0..1 coordinates (no mirroring).
    pub fn normalize(&self, pos: Position) -> (f64, f64) {
        (
            (pos.x - self.left) / self.width,
            (pos.y - self.top) / self.height,
        )
    }

    pub fn center(&self) -> Position {
        Position {
            x: self.left + self.width / 2.0,
            y: self.top + self.height / 2.0,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.left
            && pos.x < self.left + self.width
            && pos.y >= self.top
            && pos.y < self.top + self.height
    }
}
