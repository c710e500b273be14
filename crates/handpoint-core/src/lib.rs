//! handpoint-core: gesture-to-input engine.
//!
//! Design goal: keep this crate UI-agnostic and platform-agnostic.
//! Pointer injection, the HTTP backend and the landmark stream reader live in
//! `handpoint-platform`.

mod classifier;
mod click;
mod config;
mod engine;
mod filter;
mod interpolator;
mod landmark;
mod sink;
mod surface;
mod throttle;

pub use classifier::{classify, Classification};
pub use click::{ButtonState, ClickMachine, Transition};
pub use config::{
    config_path, get_config_dir, load_or_default, load_yaml, parse_yaml, save_yaml,
    BackendConfig, ConfigError, ConfigResult, EngineConfig, FeedbackConfig, GestureConfig,
    HandFilter, MotionConfig, RenderConfig,
};
pub use engine::{CursorState, Engine, EngineEvent, EngineState, Sinks};
pub use filter::MotionFilter;
pub use interpolator::{HoverTarget, HoverTracker, RenderInterpolator};
pub use landmark::{Landmark, LandmarkError, LandmarkFrame, LANDMARK_COUNT};
pub use sink::{
    BackendRequest, BackendSink, FeedbackSink, NoopBackend, NoopFeedback, PointerEvent,
    PointerSink, SinkError, SinkResult,
};
pub use surface::Surface;
pub use throttle::SyncThrottle;

/// Anatomical landmark indices (21-point hand model).
pub use landmark::index;

use serde::{Deserialize, Serialize};

/// A 2-D position, in surface pixels unless stated otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Position rounded to whole pixels.
    pub fn rounded(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Which gesture mapping is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureMode {
    /// Middle-finger base steers; index fold = left, middle fold = right.
    #[default]
    Standard,
    /// Index tip steers; raised thumb = left, no right button.
    Desk,
}

/// Handedness reported by the tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandLabel {
    Left,
    Right,
    #[default]
    #[serde(other)]
    Unknown,
}
