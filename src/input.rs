//! Per-frame input batch.
//!
//! Window events are latched into an [`InputBatch`] as they arrive and the
//! whole batch is applied at the top of the next simulation frame. Button
//! events carry their pressed state so drag modes stay latched until the
//! opposite event; key events are edge-triggered toggles.

use cgmath::Point2;
use winit::{
  event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
  keyboard::{KeyCode, PhysicalKey},
};

/// Pixels per scroll "line" when the platform reports pixel deltas.
const PIXELS_PER_LINE: f32 = 40.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
  /// Left button pressed (`true`) or released (`false`).
  Rotate(bool),
  /// Right button pressed (`true`) or released (`false`).
  Pan(bool),
  Scroll(f32),
  ToggleStart,
  ToggleRideAlong,
}

#[derive(Clone, Debug, Default)]
pub struct InputBatch {
  events: Vec<InputEvent>,
  cursor: Option<Point2<f32>>,
}

impl InputBatch {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, event: InputEvent) {
    self.events.push(event);
  }

  pub fn set_cursor(&mut self, x: f32, y: f32) {
    self.cursor = Some(Point2::new(x, y));
  }

  pub fn events(&self) -> &[InputEvent] {
    &self.events
  }

  /// Latest cursor position seen this frame, if it moved.
  pub fn cursor(&self) -> Option<Point2<f32>> {
    self.cursor
  }

  /// Hands the collected batch over and leaves an empty one behind, keeping
  /// the last cursor position so a still pointer yields a zero delta.
  pub fn take(&mut self) -> InputBatch {
    let cursor = self.cursor;
    let batch = std::mem::take(self);
    self.cursor = cursor;
    batch
  }

  pub fn process_events(&mut self, event: &WindowEvent) -> bool {
    match event {
      WindowEvent::MouseInput { state, button, .. } => {
        let is_pressed = *state == ElementState::Pressed;
        match button {
          MouseButton::Left => {
            self.push(InputEvent::Rotate(is_pressed));
            true
          }
          MouseButton::Right => {
            self.push(InputEvent::Pan(is_pressed));
            true
          }
          _ => false,
        }
      }
      WindowEvent::MouseWheel { delta, .. } => {
        let amount = match delta {
          MouseScrollDelta::LineDelta(_, y) => *y,
          MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
        };
        self.push(InputEvent::Scroll(amount));
        true
      }
      WindowEvent::CursorMoved { position, .. } => {
        self.set_cursor(position.x as f32, position.y as f32);
        true
      }
      WindowEvent::KeyboardInput {
        event:
          KeyEvent {
            state: ElementState::Pressed,
            physical_key: PhysicalKey::Code(keycode),
            repeat: false,
            ..
          },
        ..
      } => match keycode {
        KeyCode::Space => {
          self.push(InputEvent::ToggleStart);
          true
        }
        KeyCode::Enter | KeyCode::NumpadEnter => {
          self.push(InputEvent::ToggleRideAlong);
          true
        }
        _ => false,
      },
      _ => false,
    }
  }
}
