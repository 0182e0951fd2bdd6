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

//! A first-person fly camera.
//!
//! Orientation is kept as two angles in degrees. The horizontal angle wraps
//! to `[0, 360)` and the vertical angle is clamped so the camera never flips
//! over the poles. Positive vertical angles look down.

use palestra_core::math::{degrees_to_radians, radians_to_degrees, Mat4, Vec3};

const MAX_VERTICAL_ANGLE: f32 = 85.0;

/// Position, orientation and lens of the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    horizontal_angle: f32,
    vertical_angle: f32,
    field_of_view: f32,
    near_plane: f32,
    far_plane: f32,
    viewport_aspect_ratio: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            horizontal_angle: 0.0,
            vertical_angle: 0.0,
            field_of_view: 50.0,
            near_plane: 0.01,
            far_plane: 100.0,
            viewport_aspect_ratio: 4.0 / 3.0,
        }
    }
}

impl Camera {
    /// The camera position in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the camera to `position`.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Moves the camera by `offset`.
    pub fn offset_position(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Vertical field of view, in degrees.
    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    /// Sets the vertical field of view, in degrees. Must lie in `(0, 180)`.
    pub fn set_field_of_view(&mut self, field_of_view: f32) {
        debug_assert!(field_of_view > 0.0 && field_of_view < 180.0);
        self.field_of_view = field_of_view;
    }

    /// Distance to the near clip plane.
    pub fn near_plane(&self) -> f32 {
        self.near_plane
    }

    /// Distance to the far clip plane.
    pub fn far_plane(&self) -> f32 {
        self.far_plane
    }

    /// Sets both clip planes; `0 < near < far`.
    pub fn set_near_and_far_planes(&mut self, near_plane: f32, far_plane: f32) {
        debug_assert!(near_plane > 0.0 && far_plane > near_plane);
        self.near_plane = near_plane;
        self.far_plane = far_plane;
    }

    /// Width divided by height of the viewport.
    pub fn viewport_aspect_ratio(&self) -> f32 {
        self.viewport_aspect_ratio
    }

    /// Sets the viewport aspect ratio; must be positive.
    pub fn set_viewport_aspect_ratio(&mut self, aspect_ratio: f32) {
        debug_assert!(aspect_ratio > 0.0);
        self.viewport_aspect_ratio = aspect_ratio;
    }

    /// Horizontal angle, in degrees, within `[0, 360)`.
    pub fn horizontal_angle(&self) -> f32 {
        self.horizontal_angle
    }

    /// Vertical angle, in degrees, within `[-85, 85]`.
    pub fn vertical_angle(&self) -> f32 {
        self.vertical_angle
    }

    /// Rotates the camera. `up_angle` tilts (positive looks down),
    /// `right_angle` turns (positive turns right). Both in degrees.
    pub fn offset_orientation(&mut self, up_angle: f32, right_angle: f32) {
        self.horizontal_angle += right_angle;
        self.vertical_angle += up_angle;
        self.normalize_angles();
    }

    /// Turns the camera to face `target`. `target` must differ from the
    /// camera position.
    pub fn look_at(&mut self, target: Vec3) {
        let direction = (target - self.position).normalize();
        self.vertical_angle = radians_to_degrees((-direction.y).asin());
        self.horizontal_angle = -radians_to_degrees((-direction.x).atan2(-direction.z));
        self.normalize_angles();
    }

    /// The rotation part of the view transform.
    pub fn orientation(&self) -> Mat4 {
        Mat4::from_rotation_x(degrees_to_radians(self.vertical_angle))
            * Mat4::from_rotation_y(degrees_to_radians(self.horizontal_angle))
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vec3 {
        self.orientation()
            .transpose()
            .transform_vector3(Vec3::new(0.0, 0.0, -1.0))
    }

    /// Unit vector to the camera's right.
    pub fn right(&self) -> Vec3 {
        self.orientation().transpose().transform_vector3(Vec3::X)
    }

    /// Unit vector out of the top of the camera.
    pub fn up(&self) -> Vec3 {
        self.orientation().transpose().transform_vector3(Vec3::Y)
    }

    /// Projection only.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_zo(
            degrees_to_radians(self.field_of_view),
            self.viewport_aspect_ratio,
            self.near_plane,
            self.far_plane,
        )
    }

    /// Translation and rotation, without projection.
    pub fn view(&self) -> Mat4 {
        self.orientation() * Mat4::from_translation(-self.position)
    }

    /// Combined projection and view, as uploaded to the `camera` uniform.
    pub fn matrix(&self) -> Mat4 {
        self.projection() * self.view()
    }

    fn normalize_angles(&mut self) {
        self.horizontal_angle = self.horizontal_angle.rem_euclid(360.0);
        self.vertical_angle = self
            .vertical_angle
            .clamp(-MAX_VERTICAL_ANGLE, MAX_VERTICAL_ANGLE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use palestra_core::math::Vec4;

    #[test]
    fn test_default_axes() {
        let camera = Camera::default();
        assert_abs_diff_eq!(camera.forward(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert_abs_diff_eq!(camera.right(), Vec3::X, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.up(), Vec3::Y, epsilon = 1e-6);
    }

    #[test]
    fn test_orientation_wraps_and_clamps() {
        let mut camera = Camera::default();
        camera.offset_orientation(100.0, 370.0);
        assert_abs_diff_eq!(camera.horizontal_angle(), 10.0, epsilon = 1e-4);
        assert_eq!(camera.vertical_angle(), 85.0);

        camera.offset_orientation(-200.0, -20.0);
        assert_abs_diff_eq!(camera.horizontal_angle(), 350.0, epsilon = 1e-4);
        assert_eq!(camera.vertical_angle(), -85.0);
    }

    #[test]
    fn test_turning_right_looks_along_positive_x() {
        let mut camera = Camera::default();
        camera.offset_orientation(0.0, 90.0);
        assert_abs_diff_eq!(camera.forward(), Vec3::X, epsilon = 1e-5);
        assert_abs_diff_eq!(camera.right(), Vec3::Z, epsilon = 1e-5);
    }

    #[test]
    fn test_positive_vertical_looks_down() {
        let mut camera = Camera::default();
        camera.offset_orientation(30.0, 0.0);
        assert!(camera.forward().y < 0.0);
        assert!(camera.up().y > 0.0);
    }

    #[test]
    fn test_look_at() {
        let mut camera = Camera::default();
        camera.set_position(Vec3::ZERO);
        camera.look_at(Vec3::new(-5.0, 0.0, 0.0));
        assert_abs_diff_eq!(camera.forward(), Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
        assert_abs_diff_eq!(camera.horizontal_angle(), 270.0, epsilon = 1e-3);
    }

    #[test]
    fn test_view_moves_camera_to_origin() {
        let mut camera = Camera::default();
        camera.set_position(Vec3::new(0.0, 13.0, 25.0));
        camera.offset_orientation(30.0, 45.0);
        let eye = camera.view() * camera.position().extend(1.0);
        assert_abs_diff_eq!(eye, Vec4::W, epsilon = 1e-4);
    }

    #[test]
    fn test_projection_depth_range() {
        let mut camera = Camera::default();
        camera.set_near_and_far_planes(0.1, 200.0);
        let proj = camera.projection();
        let near = proj * Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -200.0, 1.0);
        assert_abs_diff_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(camera.matrix(), proj * camera.view(), epsilon = 1e-6);
    }
}
