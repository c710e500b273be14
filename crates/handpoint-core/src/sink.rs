//! Boundaries to the outside world: pointer, backend and feedback sinks.
//!
//! Implementations live in `handpoint-platform`; the no-op variants here are
//! for disabled features and tests.

use crate::{MouseButton, Position};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink failed: {0}")]
    Failed(String),
    #[error("sink closed")]
    Closed,
}

pub type SinkResult = Result<(), SinkError>;

/// Synthetic input for the local display surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Move { at: Position },
    Press { button: MouseButton, at: Position },
    Release { button: MouseButton, at: Position },
    /// Full click on the element under the cursor (left press only).
    Activate { at: Position },
    /// Context-menu trigger (right press only).
    ContextMenu { at: Position },
}

/// Consumer of synthetic pointer input.
pub trait PointerSink {
    fn dispatch(&mut self, event: PointerEvent) -> SinkResult;
}

/// Request for the remote input-injection backend. Coordinates are 0..1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendRequest {
    Move { x: f64, y: f64 },
    Click { button: MouseButton },
}

/// Fire-and-forget consumer of backend requests. `submit` must not block.
pub trait BackendSink {
    fn submit(&mut self, request: BackendRequest) -> SinkResult;
}

/// Audible/visual acknowledgment of a press.
pub trait FeedbackSink {
    fn acknowledge(&mut self, button: MouseButton, pitch_hz: f32);
}

pub struct NoopBackend;

impl BackendSink for NoopBackend {
    fn submit(&mut self, request: BackendRequest) -> SinkResult {
        debug!(?request, "NoopBackend: would submit request");
        Ok(())
    }
}

pub struct NoopFeedback;

impl FeedbackSink for NoopFeedback {
    fn acknowledge(&mut self, _button: MouseButton, _pitch_hz: f32) {}
}
