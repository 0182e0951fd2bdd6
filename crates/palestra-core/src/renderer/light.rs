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

//! Light source description shared by the scene and the render lane.
//!
//! A single flat struct covers every light kind, mirroring how the scene shader
//! consumes it: the homogeneous `w` of the position separates directional
//! lights from positional ones, and the cone angle turns a point light into a
//! spot light.

use serde::{Deserialize, Serialize};

use crate::math::{Vec3, Vec4};

/// Cone angles at or above this value never cut anything off.
pub const UNRESTRICTED_CONE_ANGLE: f32 = 180.0;

/// The kind of a [`Light`], derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    /// `position.w == 0`: `position.xyz` is the direction *towards* the light.
    Directional,
    /// Positional light radiating in every direction.
    Point,
    /// Positional light restricted to a cone around `cone_direction`.
    Spot,
}

/// One illumination source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Homogeneous position: `w = 1` for point/spot, `w = 0` for directional.
    pub position: Vec4,
    /// Light color.
    pub intensities: Vec3,
    /// Quadratic distance attenuation factor.
    pub attenuation: f32,
    /// Fraction of the light that contributes as ambient.
    pub ambient_coefficient: f32,
    /// Half-angle of the spot cone, in degrees.
    pub cone_angle: f32,
    /// Axis of the spot cone.
    pub cone_direction: Vec3,
}

impl Light {
    /// A positional light with no cone restriction.
    pub fn point(position: Vec3, intensities: Vec3, attenuation: f32) -> Self {
        Self {
            position: position.extend(1.0),
            intensities,
            attenuation,
            ambient_coefficient: 0.0,
            cone_angle: 360.0,
            cone_direction: Vec3::ZERO,
        }
    }

    /// A positional light restricted to a cone.
    pub fn spot(position: Vec3, intensities: Vec3, cone_angle: f32, cone_direction: Vec3) -> Self {
        Self {
            position: position.extend(1.0),
            intensities,
            attenuation: 0.0,
            ambient_coefficient: 0.0,
            cone_angle,
            cone_direction,
        }
    }

    /// A light infinitely far away in the direction of `towards_light`.
    pub fn directional(towards_light: Vec3, intensities: Vec3, attenuation: f32) -> Self {
        Self {
            position: towards_light.extend(0.0),
            intensities,
            attenuation,
            ambient_coefficient: 0.0,
            cone_angle: 0.0,
            cone_direction: Vec3::ZERO,
        }
    }

    /// Sets the ambient coefficient.
    pub fn with_ambient(mut self, ambient_coefficient: f32) -> Self {
        self.ambient_coefficient = ambient_coefficient;
        self
    }

    /// Classifies the light the same way the scene shader does.
    pub fn kind(&self) -> LightKind {
        if self.position.w == 0.0 {
            LightKind::Directional
        } else if self.cone_angle >= UNRESTRICTED_CONE_ANGLE {
            LightKind::Point
        } else {
            LightKind::Spot
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_kind_from_fields() {
        let p = Light::point(Vec3::new(-70.0, 8.5, 0.0), Vec3::Y, 0.1);
        assert_eq!(p.kind(), LightKind::Point);

        let s = Light::spot(Vec3::ZERO, Vec3::ONE, 10.0, Vec3::new(-1.0, -1.0, 1.0));
        assert_eq!(s.kind(), LightKind::Spot);

        let d = Light::directional(Vec3::new(18.0, 9.5, 27.0), Vec3::splat(0.1), 0.5);
        assert_eq!(d.kind(), LightKind::Directional);
        assert_eq!(d.position.w, 0.0);
    }
}
