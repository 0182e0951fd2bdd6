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

use palestra_core::math::{Mat4, Vec3, Vec4};
use palestra_core::renderer::Light;

use super::AssetHandle;

/// Color light 1 takes while the strobe is off.
pub const STROBE_OFF: Vec3 = Vec3::new(1.0, 0.0, 0.0);
/// Color light 1 takes while the strobe is on.
pub const STROBE_ON: Vec3 = Vec3::new(1.0, 1.0, 1.0);

/// The hall's lighting: an exit sign, four ceiling spots and three dim fills.
pub fn default_lights() -> Vec<Light> {
    let fill = Vec3::splat(0.1);
    vec![
        Light {
            position: Vec4::new(-70.0, 8.5, 0.0, 1.0),
            intensities: Vec3::new(0.0, 1.0, 0.0),
            attenuation: 0.1,
            ambient_coefficient: 0.0,
            cone_angle: 360.0,
            cone_direction: Vec3::new(-10.0, 0.0, 0.0),
        },
        Light::spot(
            Vec3::new(18.0, 9.5, -27.0),
            Vec3::new(1.0, 1.0, 0.0),
            10.0,
            Vec3::new(-1.0, -1.0, 1.0),
        ),
        Light::spot(
            Vec3::new(18.0, 9.5, 27.0),
            Vec3::new(1.0, 1.0, 0.0),
            10.0,
            Vec3::new(-1.0, -1.0, -1.0),
        ),
        Light::spot(
            Vec3::new(-20.0, 9.5, -27.0),
            Vec3::new(1.0, 0.0, 1.0),
            10.0,
            Vec3::new(1.0, -1.0, 1.0),
        ),
        Light::spot(
            Vec3::new(-20.0, 9.5, 27.0),
            Vec3::new(0.0, 1.0, 1.0),
            10.0,
            Vec3::new(1.0, -1.0, -1.0),
        ),
        Light::directional(Vec3::new(18.0, 9.5, 27.0), fill, 0.5),
        Light::directional(Vec3::new(-20.0, 9.5, -27.0), fill, 0.1),
        Light::directional(Vec3::new(-20.0, -9.5, -27.0), fill, 0.1),
    ]
}

/// A placement of a shared [`ModelAsset`](crate::assets::ModelAsset) in the
/// world, lit by its own lights.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInstance {
    /// The asset drawn by this instance.
    pub asset: AssetHandle,
    /// World transform.
    pub transform: Mat4,
    /// Lights applied to every mesh of this instance, in upload order.
    pub lights: Vec<Light>,
    strobe: bool,
}

impl ModelInstance {
    /// Places `asset` at `transform` under [`default_lights`].
    pub fn new(asset: AssetHandle, transform: Mat4) -> Self {
        Self::with_lights(asset, transform, default_lights())
    }

    /// Places `asset` at `transform` under a custom set of lights.
    pub fn with_lights(asset: AssetHandle, transform: Mat4, lights: Vec<Light>) -> Self {
        Self {
            asset,
            transform,
            lights,
            strobe: false,
        }
    }

    /// Recolors light 1 for the next draw and flips the strobe.
    ///
    /// Returns the color applied, or `None` when the instance has fewer than
    /// two lights. The strobe flips either way.
    pub fn advance_strobe(&mut self) -> Option<Vec3> {
        let color = if self.strobe { STROBE_ON } else { STROBE_OFF };
        self.strobe = !self.strobe;
        let light = self.lights.get_mut(1)?;
        light.intensities = color;
        Some(color)
    }
}
