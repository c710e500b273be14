//! Click acknowledgment.

use handpoint_core::{FeedbackSink, MouseButton};
use tracing::info;

/// Logs each acknowledgment. Stands in for a tone generator on headless runs.
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn acknowledge(&mut self, button: MouseButton, pitch_hz: f32) {
        info!(button = button.as_str(), pitch_hz, "click");
    }
}
