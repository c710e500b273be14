//! Hand landmark frames as delivered by the tracker.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of points in one hand frame.
pub const LANDMARK_COUNT: usize = 21;

pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// A single tracked point. `x`/`y` are normalized to the camera frame
/// (0..1, y grows downward); `z` is relative depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LandmarkError {
    #[error("expected {LANDMARK_COUNT} landmarks, got {0}")]
    WrongCount(usize),
}

/// One hand, one video frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Landmark by anatomical index. Indices come from [`index`], so anything
    /// out of range is a caller bug.
    pub fn point(&self, id: usize) -> Landmark {
        self.points[id]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkFrame {
    type Error = LandmarkError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        let len = points.len();
        let points: [Landmark; LANDMARK_COUNT] =
            points.try_into().map_err(|_| LandmarkError::WrongCount(len))?;
        Ok(Self { points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_from_vec() {
        let points = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        let frame = LandmarkFrame::try_from(points).unwrap();
        assert_eq!(frame.point(index::WRIST).x, 0.5);
    }

    #[test]
    fn test_frame_wrong_count() {
        let points = vec![Landmark::default(); 20];
        assert_eq!(
            LandmarkFrame::try_from(points),
            Err(LandmarkError::WrongCount(20))
        );
    }

    #[test]
    fn test_landmark_z_defaults() {
        let lm: Landmark = serde_json::from_str(r#"{"x":0.25,"y":0.75}"#).unwrap();
        assert_eq!(lm, Landmark::new(0.25, 0.75, 0.0));
    }
}
