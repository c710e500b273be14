//! Debounced click state machine, one instance per button.

use serde::{Deserialize, Serialize};

/// Button state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonState {
    #[default]
    Up,
    Down,
}

/// Edge produced by a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Up -> Down.
    Pressed,
    /// Down -> Up.
    Released,
}

impl ButtonState {
    /// Next state for the given intent, plus the edge if the state changed.
    pub fn on_intent(self, intent: bool) -> (ButtonState, Option<Transition>) {
        match (self, intent) {
            (ButtonState::Up, true) => (ButtonState::Down, Some(Transition::Pressed)),
            (ButtonState::Down, false) => (ButtonState::Up, Some(Transition::Released)),
            (state, _) => (state, None),
        }
    }

    pub fn is_down(self) -> bool {
        self == ButtonState::Down
    }
}

/// Edge detector over a noisy per-frame intent.
///
/// With `hold_frames > 1` the opposite intent must be seen on that many
/// consecutive frames before the edge fires, which stops flapping when a
/// finger sits right at the fold threshold.
#[derive(Debug, Clone)]
pub struct ClickMachine {
    state: ButtonState,
    hold_frames: u32,
    pending: u32,
}

impl ClickMachine {
    pub fn new(hold_frames: u32) -> Self {
        Self {
            state: ButtonState::Up,
            hold_frames: hold_frames.max(1),
            pending: 0,
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Feed one frame's intent. Returns the edge, if any.
    pub fn update(&mut self, intent: bool) -> Option<Transition> {
        let (next, transition) = self.state.on_intent(intent);
        let Some(transition) = transition else {
            self.pending = 0;
            return None;
        };

        self.pending += 1;
        if self.pending < self.hold_frames {
            return None;
        }

        self.pending = 0;
        self.state = next;
        Some(transition)
    }

    /// Return to `Up` without going through `update`. Reports whether the
    /// button was down.
    pub fn force_up(&mut self) -> bool {
        let was_down = self.state.is_down();
        self.state = ButtonState::Up;
        self.pending = 0;
        was_down
    }
}

impl Default for ClickMachine {
    fn default() -> Self {
        Self::new(1)
    }
}
