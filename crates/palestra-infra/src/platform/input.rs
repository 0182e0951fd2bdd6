// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Translation from `winit` window events to Palestra's input events, and the
//! polled key/wheel state the camera controls read every frame.

use std::collections::HashSet;

use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels of touchpad scrolling that count as one wheel notch.
pub const PIXELS_PER_WHEEL_NOTCH: f32 = 20.0;

/// The keys the demo reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move forward.
    W,
    /// Strafe left.
    A,
    /// Move backward.
    S,
    /// Strafe right.
    D,
    /// Move down.
    Z,
    /// Move up.
    X,
    /// Look up.
    Up,
    /// Look down.
    Down,
    /// Turn left.
    Left,
    /// Turn right.
    Right,
    /// Quit.
    Escape,
}

/// A backend-agnostic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key went down. Auto-repeat does not produce further events.
    KeyPressed {
        /// The key.
        key: Key,
    },
    /// A key went up.
    KeyReleased {
        /// The key.
        key: Key,
    },
    /// The mouse wheel turned, in notches.
    MouseWheelScrolled {
        /// Horizontal delta.
        delta_x: f32,
        /// Vertical delta; positive scrolls away from the user.
        delta_y: f32,
    },
}

/// Translates a `winit::event::WindowEvent` into an [`InputEvent`].
///
/// Returns `None` for events that are not input, and for keys the demo does
/// not use.
pub fn translate_winit_input(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput {
            event: key_event, ..
        } => {
            let PhysicalKey::Code(code) = key_event.physical_key else {
                return None;
            };
            let key = map_keycode(code)?;
            match key_event.state {
                ElementState::Pressed if !key_event.repeat => Some(InputEvent::KeyPressed { key }),
                ElementState::Released => Some(InputEvent::KeyReleased { key }),
                _ => None,
            }
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(pos) => (
                    pos.x as f32 / PIXELS_PER_WHEEL_NOTCH,
                    pos.y as f32 / PIXELS_PER_WHEEL_NOTCH,
                ),
            };
            (dx != 0.0 || dy != 0.0).then_some(InputEvent::MouseWheelScrolled {
                delta_x: dx,
                delta_y: dy,
            })
        }
        _ => None,
    }
}

fn map_keycode(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyZ => Key::Z,
        KeyCode::KeyX => Key::X,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::Escape => Key::Escape,
        _ => return None,
    })
}

/// Keys currently held and wheel motion not yet consumed.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<Key>,
    wheel: f32,
}

impl InputState {
    /// Folds one event into the state.
    pub fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyPressed { key } => {
                self.pressed.insert(*key);
            }
            InputEvent::KeyReleased { key } => {
                self.pressed.remove(key);
            }
            InputEvent::MouseWheelScrolled { delta_y, .. } => self.wheel += delta_y,
        }
    }

    /// Whether `key` is held down.
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Returns the vertical wheel motion since the last call and resets it.
    pub fn take_wheel(&mut self) -> f32 {
        std::mem::take(&mut self.wheel)
    }

    /// Forgets every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }
}
