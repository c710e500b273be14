//! Per-frame gesture classification.

use crate::landmark::index;
use crate::{GestureMode, LandmarkFrame, Position, Surface};

/// Result of classifying one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub left_intent: bool,
    pub right_intent: bool,
    /// Raw (unfiltered) pointer target in surface pixels.
    pub target: Position,
}

/// Classify a frame under the given mode. Pure function of its inputs.
///
/// Fold tests compare normalized y only; y grows downward, so a tip with a
/// larger y than its reference joint is below it.
pub fn classify(frame: &LandmarkFrame, mode: GestureMode, surface: &Surface) -> Classification {
    match mode {
        GestureMode::Standard => Classification {
            left_intent: is_below(frame, index::INDEX_TIP, index::INDEX_PIP),
            right_intent: is_below(frame, index::MIDDLE_TIP, index::MIDDLE_PIP),
            target: surface.project(frame.point(index::MIDDLE_MCP)),
        },
        GestureMode::Desk => Classification {
            left_intent: is_above(frame, index::THUMB_TIP, index::THUMB_IP),
            right_intent: false,
            target: surface.project(frame.point(index::INDEX_TIP)),
        },
    }
}

fn is_below(frame: &LandmarkFrame, tip: usize, joint: usize) -> bool {
    frame.point(tip).y > frame.point(joint).y
}

fn is_above(frame: &LandmarkFrame, tip: usize, joint: usize) -> bool {
    frame.point(tip).y < frame.point(joint).y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Landmark, LANDMARK_COUNT};

    fn frame_with(overrides: &[(usize, f64, f64)]) -> LandmarkFrame {
        let mut points = [Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        for &(id, x, y) in overrides {
            points[id] = Landmark::new(x, y, 0.0);
        }
        LandmarkFrame::new(points)
    }

    #[test]
    fn test_standard_index_folded() {
        let frame = frame_with(&[
            (index::INDEX_TIP, 0.5, 0.8),
            (index::INDEX_PIP, 0.5, 0.5),
            (index::MIDDLE_TIP, 0.5, 0.3),
            (index::MIDDLE_PIP, 0.5, 0.5),
        ]);
        let c = classify(&frame, GestureMode::Standard, &Surface::default());
        assert!(c.left_intent);
        assert!(!c.right_intent);
    }

    #[test]
    fn test_standard_middle_folded() {
        let frame = frame_with(&[
            (index::INDEX_TIP, 0.5, 0.3),
            (index::MIDDLE_TIP, 0.5, 0.7),
            (index::MIDDLE_PIP, 0.5, 0.5),
        ]);
        let c = classify(&frame, GestureMode::Standard, &Surface::default());
        assert!(!c.left_intent);
        assert!(c.right_intent);
    }

    #[test]
    fn test_standard_target_is_middle_mcp_mirrored() {
        let frame = frame_with(&[(index::MIDDLE_MCP, 0.2, 0.4)]);
        let surface = Surface::new(0.0, 0.0, 1000.0, 500.0);
        let c = classify(&frame, GestureMode::Standard, &surface);
        assert!((c.target.x - 800.0).abs() < 1e-9);
        assert!((c.target.y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_desk_thumb_raised() {
        let frame = frame_with(&[
            (index::THUMB_TIP, 0.5, 0.2),
            (index::THUMB_IP, 0.5, 0.5),
            // Folded middle finger must not produce a right click in desk mode.
            (index::MIDDLE_TIP, 0.5, 0.9),
            (index::MIDDLE_PIP, 0.5, 0.5),
        ]);
        let c = classify(&frame, GestureMode::Desk, &Surface::default());
        assert!(c.left_intent);
        assert!(!c.right_intent);
    }

    #[test]
    fn test_desk_target_is_index_tip() {
        let frame = frame_with(&[(index::INDEX_TIP, 0.0, 1.0)]);
        let surface = Surface::new(10.0, 20.0, 100.0, 100.0);
        let c = classify(&frame, GestureMode::Desk, &surface);
        assert_eq!(c.target, Position::new(110.0, 120.0));
    }

    #[test]
    fn test_equal_heights_are_not_folded() {
        let frame = frame_with(&[]);
        let c = classify(&frame, GestureMode::Standard, &Surface::default());
        assert!(!c.left_intent && !c.right_intent);
        let c = classify(&frame, GestureMode::Desk, &Surface::default());
        assert!(!c.left_intent);
    }
}
