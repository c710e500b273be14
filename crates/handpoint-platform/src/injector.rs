//! Pointer sinks for the local display.

use crate::{PlatformError, PlatformResult};
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use handpoint_core::{MouseButton, PointerEvent, PointerSink, Position, SinkResult};
use tracing::{debug, trace};

/// Logs pointer events instead of injecting them.
pub struct NoopPointer;

impl PointerSink for NoopPointer {
    fn dispatch(&mut self, event: PointerEvent) -> SinkResult {
        match event {
            PointerEvent::Move { .. } => trace!(?event, "NoopPointer: would inject"),
            _ => debug!(?event, "NoopPointer: would inject"),
        }
        Ok(())
    }
}

/// Real pointer injection using the `enigo` crate. Surface pixels are used
/// as absolute screen coordinates.
pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn new() -> PlatformResult<Self> {
        let settings = Settings::default();
        let enigo = Enigo::new(&settings).map_err(|e| {
            PlatformError::InjectionFailed(format!("failed to create Enigo: {e}"))
        })?;
        Ok(Self { enigo })
    }

    fn move_to(&mut self, at: Position) -> PlatformResult<()> {
        let (x, y) = at.rounded();
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| PlatformError::InjectionFailed(e.to_string()))
    }

    fn button(&mut self, button: MouseButton, direction: Direction) -> PlatformResult<()> {
        self.enigo
            .button(mouse_button_to_enigo(button), direction)
            .map_err(|e| PlatformError::InjectionFailed(e.to_string()))
    }

    fn inject(&mut self, event: PointerEvent) -> PlatformResult<()> {
        match event {
            PointerEvent::Move { at } => {
                trace!(x = at.x, y = at.y, "injecting mouse move");
                self.move_to(at)?;
            }
            PointerEvent::Press { button, at } => {
                debug!(x = at.x, y = at.y, ?button, "injecting mouse down");
                self.move_to(at)?;
                self.button(button, Direction::Press)?;
            }
            PointerEvent::Release { button, at } => {
                debug!(x = at.x, y = at.y, ?button, "injecting mouse up");
                self.move_to(at)?;
                self.button(button, Direction::Release)?;
            }
            // The OS turns the press/release pair into a click or context menu.
            PointerEvent::Activate { .. } | PointerEvent::ContextMenu { .. } => {
                trace!(?event, "covered by native press/release");
            }
        }
        Ok(())
    }
}

impl PointerSink for EnigoPointer {
    fn dispatch(&mut self, event: PointerEvent) -> SinkResult {
        Ok(self.inject(event)?)
    }
}

fn mouse_button_to_enigo(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Right => Button::Right,
    }
}
