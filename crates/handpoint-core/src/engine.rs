//! Gesture engine: owns every component and all mutable cursor state.
//!
//! The engine is driven from a single thread by two independent clocks: landmark
//! frames (`on_hand_data` / `on_hand_lost`) and display ticks (`tick`). Neither
//! call blocks; backend traffic goes through the non-blocking `BackendSink`.

use crate::click::{ClickMachine, Transition};
use crate::config::EngineConfig;
use crate::filter::MotionFilter;
use crate::interpolator::{HoverTracker, RenderInterpolator};
use crate::sink::{BackendRequest, BackendSink, FeedbackSink, PointerEvent, PointerSink};
use crate::throttle::SyncThrottle;
use crate::{classify, GestureMode, HandLabel, LandmarkFrame, MouseButton, Position};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Not consuming landmark frames.
    #[default]
    Idle,
    /// Consuming landmark frames.
    Running,
}

/// Events emitted by the engine for status displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    StateChanged { old: EngineState, new: EngineState },
    ButtonChanged { button: MouseButton, down: bool },
    HoverChanged { target: Option<String> },
    HandLost,
    ModeChanged { mode: GestureMode },
    BackendToggled { enabled: bool },
}

/// Snapshot of the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CursorState {
    /// First-stage interpolated position; clicks and hover use this.
    pub current: Position,
    /// Second-stage smoothed position shown to the user.
    pub displayed: Position,
    /// Filtered target the interpolator is heading for.
    pub target: Position,
    pub left_down: bool,
    pub right_down: bool,
}

/// Everything the engine talks to.
pub struct Sinks {
    pub pointer: Box<dyn PointerSink>,
    pub backend: Box<dyn BackendSink>,
    pub feedback: Box<dyn FeedbackSink>,
}

pub struct Engine {
    config: EngineConfig,
    state: EngineState,
    mode: GestureMode,
    backend_enabled: bool,
    filter: MotionFilter,
    interpolator: RenderInterpolator,
    hover: HoverTracker,
    left: ClickMachine,
    right: ClickMachine,
    throttle: SyncThrottle,
    sinks: Sinks,
    events: Option<Sender<EngineEvent>>,
    last_move: Option<(i32, i32)>,
}

impl Engine {
    pub fn new(config: EngineConfig, sinks: Sinks) -> Self {
        let center = config.surface.center();
        let debounce = config.gesture.debounce_frames;

        Self {
            state: EngineState::Idle,
            mode: config.gesture.mode,
            backend_enabled: config.backend.enabled,
            filter: MotionFilter::new(config.motion.history_len),
            interpolator: RenderInterpolator::new(
                center,
                config.render.lerp_amount,
                config.render.smoothing,
            ),
            hover: HoverTracker::new(config.hover_targets.clone()),
            left: ClickMachine::new(debounce),
            right: ClickMachine::new(debounce),
            throttle: SyncThrottle::new(
                config.backend.sync_interval(),
                config.backend.jitter_threshold,
            ),
            sinks,
            events: None,
            last_move: None,
            config,
        }
    }

    /// Report engine events on `tx`. Sends never block; events are dropped
    /// when the channel is full.
    pub fn with_events(mut self, tx: Sender<EngineEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    pub fn backend_enabled(&self) -> bool {
        self.backend_enabled
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hover.hovered()
    }

    pub fn cursor(&self) -> CursorState {
        CursorState {
            current: self.interpolator.current(),
            displayed: self.interpolator.smoothed(),
            target: self.interpolator.target(),
            left_down: self.left.state().is_down(),
            right_down: self.right.state().is_down(),
        }
    }

    pub fn set_mode(&mut self, mode: GestureMode) {
        if self.mode != mode {
            info!(?mode, "Gesture mode changed");
            self.mode = mode;
            self.emit(EngineEvent::ModeChanged { mode });
        }
    }

    pub fn set_backend_enabled(&mut self, enabled: bool) {
        if self.backend_enabled != enabled {
            info!(enabled, "Backend forwarding toggled");
            self.backend_enabled = enabled;
            self.emit(EngineEvent::BackendToggled { enabled });
        }
    }

    /// Start consuming landmark frames.
    pub fn start(&mut self) {
        if self.state == EngineState::Running {
            return;
        }
        self.transition_state(EngineState::Running);
        info!("Engine started");
    }

    /// Stop consuming frames and reset cursor state. In-flight backend
    /// requests are left to finish on their own.
    pub fn stop(&mut self) {
        if self.state == EngineState::Idle {
            return;
        }

        let at = self.interpolator.current();
        for button in [MouseButton::Left, MouseButton::Right] {
            if self.machine(button).force_up() {
                if self.config.release_on_stop {
                    debug!(?button, "releasing held button on stop");
                    self.dispatch(PointerEvent::Release { button, at });
                }
                self.emit(EngineEvent::ButtonChanged {
                    button,
                    down: false,
                });
            }
        }

        self.filter.clear();
        self.throttle.reset();
        self.interpolator.reset(self.config.surface.center());
        self.last_move = None;
        if self.hover.hovered().is_some() {
            self.hover.clear();
            self.emit(EngineEvent::HoverChanged { target: None });
        }

        self.transition_state(EngineState::Idle);
        info!("Engine stopped");
    }

    /// Process one landmark frame.
    pub fn on_hand_data(&mut self, frame: &LandmarkFrame, hand: HandLabel, now: Instant) {
        if self.state != EngineState::Running {
            return;
        }
        if !self.config.gesture.hand.accepts(hand) {
            trace!(?hand, "ignoring frame from filtered hand");
            return;
        }

        let classification = classify(frame, self.mode, &self.config.surface);

        let target = self.filter.observe(classification.target);
        self.interpolator.set_target(target);

        self.apply_intent(MouseButton::Left, classification.left_intent);
        self.apply_intent(MouseButton::Right, classification.right_intent);

        if self.backend_enabled {
            let (nx, ny) = self.config.surface.normalize(target);
            if let Some((x, y)) = self.throttle.maybe_forward(nx, ny, now) {
                self.submit(BackendRequest::Move { x, y });
            }
        }
    }

    /// The tracker lost the hand. The cursor keeps gliding to the last target.
    pub fn on_hand_lost(&mut self) {
        if self.state != EngineState::Running {
            return;
        }
        debug!("hand lost");
        self.emit(EngineEvent::HandLost);
    }

    /// Advance the interpolator one display tick and return the displayed
    /// position. Runs regardless of engine state.
    pub fn tick(&mut self) -> Position {
        let displayed = self.interpolator.advance();

        let rounded = displayed.rounded();
        if self.last_move != Some(rounded) {
            self.last_move = Some(rounded);
            self.dispatch(PointerEvent::Move { at: displayed });
        }

        let current = self.interpolator.current();
        if let Some(hovered) = self.hover.update(current) {
            let target = hovered.map(str::to_string);
            trace!(?target, "hover changed");
            self.emit(EngineEvent::HoverChanged { target });
        }

        displayed
    }

    fn apply_intent(&mut self, button: MouseButton, intent: bool) {
        let Some(transition) = self.machine(button).update(intent) else {
            return;
        };

        let at = self.interpolator.current();
        match transition {
            Transition::Pressed => {
                debug!(?button, x = at.x, y = at.y, "button pressed");
                self.dispatch(PointerEvent::Press { button, at });
                let pitch = self.config.feedback.pitch(button);
                self.sinks.feedback.acknowledge(button, pitch);
                match button {
                    MouseButton::Left => self.dispatch(PointerEvent::Activate { at }),
                    MouseButton::Right => self.dispatch(PointerEvent::ContextMenu { at }),
                }
                if self.backend_enabled {
                    self.submit(BackendRequest::Click { button });
                }
                self.emit(EngineEvent::ButtonChanged { button, down: true });
            }
            Transition::Released => {
                debug!(?button, x = at.x, y = at.y, "button released");
                self.dispatch(PointerEvent::Release { button, at });
                self.emit(EngineEvent::ButtonChanged {
                    button,
                    down: false,
                });
            }
        }
    }

    fn machine(&mut self, button: MouseButton) -> &mut ClickMachine {
        match button {
            MouseButton::Left => &mut self.left,
            MouseButton::Right => &mut self.right,
        }
    }

    fn dispatch(&mut self, event: PointerEvent) {
        if let Err(e) = self.sinks.pointer.dispatch(event) {
            warn!(?event, error = %e, "pointer sink failed");
        }
    }

    fn submit(&mut self, request: BackendRequest) {
        if let Err(e) = self.sinks.backend.submit(request) {
            warn!(?request, error = %e, "backend submit failed");
        }
    }

    fn transition_state(&mut self, new: EngineState) {
        let old = self.state;
        if old != new {
            self.state = new;
            debug!(?old, ?new, "state transition");
            self.emit(EngineEvent::StateChanged { old, new });
        }
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(tx) = &self.events {
            if let Err(e) = tx.try_send(event) {
                warn!("Failed to emit engine event: {}", e);
            }
        }
    }
}
