//! Engine configuration and YAML persistence.

use crate::{GestureMode, HandLabel, HoverTarget, MouseButton, Surface};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub surface: Surface,
    pub motion: MotionConfig,
    pub render: RenderConfig,
    pub gesture: GestureConfig,
    pub backend: BackendConfig,
    pub feedback: FeedbackConfig,
    pub hover_targets: Vec<HoverTarget>,
    /// Synthesize a release for held buttons when the engine stops.
    pub release_on_stop: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            surface: Surface::default(),
            motion: MotionConfig::default(),
            render: RenderConfig::default(),
            gesture: GestureConfig::default(),
            backend: BackendConfig::default(),
            feedback: FeedbackConfig::default(),
            hover_targets: Vec::new(),
            release_on_stop: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Number of raw samples averaged by the motion filter.
    pub history_len: usize,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self { history_len: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Fraction of the remaining distance covered per tick.
    pub lerp_amount: f64,
    /// Weight of the previous smoothed position in the second stage.
    pub smoothing: f64,
    /// Display tick interval (milliseconds).
    pub tick_interval_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            lerp_amount: 0.1,
            smoothing: 0.7,
            tick_interval_ms: 16,
        }
    }
}

impl RenderConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Which hands the engine reacts to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandFilter {
    #[default]
    Any,
    Left,
    Right,
}

impl HandFilter {
    pub fn accepts(self, hand: HandLabel) -> bool {
        match self {
            HandFilter::Any => true,
            HandFilter::Left => hand == HandLabel::Left,
            HandFilter::Right => hand == HandLabel::Right,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub mode: GestureMode,
    /// Consecutive frames an intent must hold before a click edge fires.
    /// 1 reacts on the first frame.
    pub debounce_frames: u32,
    pub hand: HandFilter,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            mode: GestureMode::Standard,
            debounce_frames: 1,
            hand: HandFilter::Any,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub enabled: bool,
    pub base_url: String,
    /// Minimum time between forwarded moves (milliseconds).
    pub sync_interval_ms: u64,
    /// Minimum per-axis change (normalized units) worth forwarding.
    pub jitter_threshold: f64,
    /// Request timeout (milliseconds). None leaves requests unbounded.
    pub timeout_ms: Option<u64>,
    /// Timeout for the blocking health check (milliseconds).
    pub health_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:5000".to_string(),
            sync_interval_ms: 30,
            jitter_threshold: 0.001,
            timeout_ms: None,
            health_timeout_ms: 2000,
        }
    }
}

impl BackendConfig {
    pub fn sync_interval(&self) -> Duration {
        Duration::from_millis(self.sync_interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub left_pitch_hz: f32,
    pub right_pitch_hz: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            left_pitch_hz: 440.0,
            right_pitch_hz: 220.0,
        }
    }
}

impl FeedbackConfig {
    pub fn pitch(&self, button: MouseButton) -> f32 {
        match button {
            MouseButton::Left => self.left_pitch_hz,
            MouseButton::Right => self.right_pitch_hz,
        }
    }
}

impl EngineConfig {
    /// Replace values the engine cannot work with.
    pub fn validated(mut self) -> Self {
        if self.motion.history_len == 0 {
            warn!("motion.history_len must be at least 1, using 1");
            self.motion.history_len = 1;
        }
        if !(self.render.lerp_amount > 0.0 && self.render.lerp_amount <= 1.0) {
            warn!(
                lerp_amount = self.render.lerp_amount,
                "render.lerp_amount out of (0, 1], using default"
            );
            self.render.lerp_amount = RenderConfig::default().lerp_amount;
        }
        if !(self.render.smoothing >= 0.0 && self.render.smoothing < 1.0) {
            warn!(
                smoothing = self.render.smoothing,
                "render.smoothing out of [0, 1), using default"
            );
            self.render.smoothing = RenderConfig::default().smoothing;
        }
        if self.render.tick_interval_ms == 0 {
            warn!("render.tick_interval_ms must be non-zero, using default");
            self.render.tick_interval_ms = RenderConfig::default().tick_interval_ms;
        }
        if !(self.backend.jitter_threshold.is_finite() && self.backend.jitter_threshold >= 0.0) {
            warn!(
                jitter_threshold = self.backend.jitter_threshold,
                "backend.jitter_threshold must be finite and non-negative, using default"
            );
            self.backend.jitter_threshold = BackendConfig::default().jitter_threshold;
        }
        if self.backend.health_timeout_ms == 0 {
            warn!("backend.health_timeout_ms must be non-zero, using default");
            self.backend.health_timeout_ms = BackendConfig::default().health_timeout_ms;
        }
        if !(self.surface.width > 0.0 && self.surface.height > 0.0) {
            warn!(surface = ?self.surface, "surface must have a positive size, using default");
            self.surface = Surface::default();
        }
        self
    }
}

/// Get the config directory for handpoint.
pub fn get_config_dir() -> PathBuf {
    let base = dirs_next::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("handpoint")
}

/// Default config file location.
pub fn config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load a YAML file from disk.
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> ConfigResult<T> {
    let content = fs::read_to_string(path)?;
    parse_yaml(&content)
}

/// Parse YAML from a string.
pub fn parse_yaml<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    Ok(serde_yaml::from_str(content)?)
}

/// Save a value as YAML, creating parent directories.
pub fn save_yaml<T: Serialize>(path: impl AsRef<Path>, value: &T) -> ConfigResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_yaml::to_string(value)?)?;
    info!(?path, "Saved config");
    Ok(())
}

/// Load the engine config at `path`, falling back to defaults when the file
/// is missing or invalid.
pub fn load_or_default(path: impl AsRef<Path>) -> EngineConfig {
    let path = path.as_ref();
    if !path.exists() {
        debug!(?path, "No config file found, using defaults");
        return EngineConfig::default();
    }

    match load_yaml::<EngineConfig>(path) {
        Ok(config) => {
            info!(?path, "Loaded config");
            config.validated()
        }
        Err(e) => {
            warn!(?path, error = %e, "Failed to load config, using defaults");
            EngineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: EngineConfig = parse_yaml(
            r#"
gesture:
  mode: desk
backend:
  enabled: true
"#,
        )
        .unwrap();

        assert_eq!(config.gesture.mode, GestureMode::Desk);
        assert_eq!(config.gesture.debounce_frames, 1);
        assert!(config.backend.enabled);
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.backend.sync_interval(), Duration::from_millis(30));
        assert_eq!(config.motion.history_len, 10);
        assert!(config.release_on_stop);
    }

    #[test]
    fn test_hover_targets_parse() {
        let config: EngineConfig = parse_yaml(
            r#"
hover_targets:
  - id: trash
    left: 10
    top: 20
    width: 64
    height: 64
"#,
        )
        .unwrap();
        assert_eq!(config.hover_targets.len(), 1);
        assert_eq!(config.hover_targets[0].id, "trash");
    }

    #[test]
    fn test_validated_clamps() {
        let mut config = EngineConfig::default();
        config.motion.history_len = 0;
        config.render.lerp_amount = 0.0;
        config.render.smoothing = 1.0;
        config.surface.width = 0.0;

        let config = config.validated();
        assert_eq!(config.motion.history_len, 1);
        assert_eq!(config.render.lerp_amount, 0.1);
        assert_eq!(config.render.smoothing, 0.7);
        assert_eq!(config.surface, Surface::default());
    }

    #[test]
    fn test_validated_rejects_bad_jitter_threshold() {
        for bad in [f64::NAN, f64::INFINITY, -0.5] {
            let mut config = EngineConfig::default();
            config.backend.jitter_threshold = bad;
            assert_eq!(config.validated().backend.jitter_threshold, 0.001);
        }

        let mut config = EngineConfig::default();
        config.backend.jitter_threshold = 0.0;
        assert_eq!(config.validated().backend.jitter_threshold, 0.0);
    }

    #[test]
    fn test_health_timeout_defaults_and_validates() {
        let config = EngineConfig::default();
        assert_eq!(config.backend.health_timeout(), Duration::from_secs(2));

        let mut config = EngineConfig::default();
        config.backend.health_timeout_ms = 0;
        assert_eq!(config.validated().backend.health_timeout_ms, 2000);
    }

    #[test]
    fn test_hand_filter() {
        assert!(HandFilter::Any.accepts(HandLabel::Unknown));
        assert!(HandFilter::Right.accepts(HandLabel::Right));
        assert!(!HandFilter::Right.accepts(HandLabel::Left));
    }

    #[test]
    fn test_yaml_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!(
            "handpoint-config-test-{}.yaml",
            std::process::id()
        ));
        let mut config = EngineConfig::default();
        config.feedback.left_pitch_hz = 880.0;
        save_yaml(&path, &config).unwrap();

        let loaded = load_or_default(&path);
        assert_eq!(loaded.feedback.left_pitch_hz, 880.0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_defaults() {
        let config = load_or_default("/nonexistent/handpoint/config.yaml");
        assert_eq!(config.motion.history_len, 10);
    }
}
