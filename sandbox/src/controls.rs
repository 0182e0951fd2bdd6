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

//! First-person fly controls polled once per frame.

use palestra_data::scene::Camera;
use palestra_infra::{InputState, Key};

use crate::config::ControlsConfig;

/// Moves and turns the camera from the held keys and the wheel.
///
/// Opposite keys do not cancel out: the first one checked wins, and only one
/// arrow key turns the camera per frame.
#[derive(Debug, Clone, Default)]
pub struct FlyControls {
    config: ControlsConfig,
}

impl FlyControls {
    pub fn new(config: ControlsConfig) -> Self {
        Self { config }
    }

    /// Applies `seconds` worth of input to `camera` and consumes the wheel.
    pub fn update(&self, camera: &mut Camera, input: &mut InputState, seconds: f32) {
        let step = seconds * self.config.move_speed;

        if input.is_pressed(Key::S) {
            camera.offset_position(-camera.forward() * step);
        } else if input.is_pressed(Key::W) {
            camera.offset_position(camera.forward() * step);
        }
        if input.is_pressed(Key::A) {
            camera.offset_position(-camera.right() * step);
        } else if input.is_pressed(Key::D) {
            camera.offset_position(camera.right() * step);
        }
        if input.is_pressed(Key::Z) {
            camera.offset_position(-camera.up() * step);
        } else if input.is_pressed(Key::X) {
            camera.offset_position(camera.up() * step);
        }

        let turn = seconds * self.config.horizontal_turn_speed;
        let tilt = seconds * self.config.vertical_turn_speed;
        if input.is_pressed(Key::Right) {
            camera.offset_orientation(0.0, turn);
        } else if input.is_pressed(Key::Left) {
            camera.offset_orientation(0.0, -turn);
        } else if input.is_pressed(Key::Down) {
            camera.offset_orientation(tilt, 0.0);
        } else if input.is_pressed(Key::Up) {
            camera.offset_orientation(-tilt, 0.0);
        }

        let wheel = input.take_wheel();
        if wheel != 0.0 {
            let field_of_view = (camera.field_of_view() + self.config.zoom_sensitivity * wheel)
                .clamp(self.config.min_field_of_view, self.config.max_field_of_view);
            camera.set_field_of_view(field_of_view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use palestra_core::math::Vec3;
    use palestra_infra::InputEvent;

    fn held(keys: &[Key]) -> InputState {
        let mut input = InputState::default();
        for key in keys {
            input.apply(&InputEvent::KeyPressed { key: *key });
        }
        input
    }

    fn camera_at_origin() -> Camera {
        let mut camera = Camera::default();
        camera.set_position(Vec3::ZERO);
        camera
    }

    #[test]
    fn test_forward_and_strafe() {
        let controls = FlyControls::default();
        let mut camera = camera_at_origin();
        controls.update(&mut camera, &mut held(&[Key::W, Key::D]), 1.0);
        assert_abs_diff_eq!(camera.position(), Vec3::new(5.0, 0.0, -5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_backward_wins_over_forward() {
        let controls = FlyControls::default();
        let mut camera = camera_at_origin();
        controls.update(&mut camera, &mut held(&[Key::W, Key::S]), 0.5);
        assert_abs_diff_eq!(camera.position(), Vec3::new(0.0, 0.0, 2.5), epsilon = 1e-5);
    }

    #[test]
    fn test_vertical_movement() {
        let controls = FlyControls::default();
        let mut camera = camera_at_origin();
        controls.update(&mut camera, &mut held(&[Key::Z]), 2.0);
        assert_abs_diff_eq!(camera.position(), Vec3::new(0.0, -10.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_one_arrow_per_frame() {
        let controls = FlyControls::default();
        let mut camera = camera_at_origin();
        controls.update(&mut camera, &mut held(&[Key::Right, Key::Down]), 0.5);
        assert_relative_eq!(camera.horizontal_angle(), 45.0);
        assert_relative_eq!(camera.vertical_angle(), 0.0);

        controls.update(&mut camera, &mut held(&[Key::Up]), 0.5);
        assert_relative_eq!(camera.vertical_angle(), -20.0);
    }

    #[test]
    fn test_wheel_zooms_and_clamps() {
        let controls = FlyControls::default();
        let mut camera = Camera::default();
        camera.set_field_of_view(90.0);
        let mut input = InputState::default();

        input.apply(&InputEvent::MouseWheelScrolled {
            delta_x: 0.0,
            delta_y: 2.0,
        });
        controls.update(&mut camera, &mut input, 0.016);
        assert_relative_eq!(camera.field_of_view(), 86.0);

        // The wheel was consumed.
        controls.update(&mut camera, &mut input, 0.016);
        assert_relative_eq!(camera.field_of_view(), 86.0);

        input.apply(&InputEvent::MouseWheelScrolled {
            delta_x: 0.0,
            delta_y: -100.0,
        });
        controls.update(&mut camera, &mut input, 0.016);
        assert_relative_eq!(camera.field_of_view(), 130.0);
    }
}
