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

//! Per-frame render configuration: texture filtering and fog.

use serde::{Deserialize, Serialize};

use super::texture::{FilterMode, SamplerState};
use crate::math::Vec4;

/// The fog falloff curve. The shader receives it as `0`, `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FogEquation {
    /// `exp(-density * d)`
    #[default]
    Exponential,
    /// `exp(-(density * d)^2)`
    ExponentialSquared,
    /// Linear ramp between `start` and `end`.
    Linear,
}

impl FogEquation {
    /// The integer code the scene shader switches on.
    pub fn code(self) -> i32 {
        match self {
            FogEquation::Exponential => 0,
            FogEquation::ExponentialSquared => 1,
            FogEquation::Linear => 2,
        }
    }
}

/// Distance-based color blending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fog {
    /// Density for the exponential equations.
    pub density: f32,
    /// Falloff curve.
    pub equation: FogEquation,
    /// Fog color (RGBA).
    pub color: Vec4,
    /// Linear fog start distance.
    pub start: f32,
    /// Linear fog end distance.
    pub end: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            density: 0.04,
            equation: FogEquation::Exponential,
            color: Vec4::new(0.5, 0.5, 0.5, 1.0),
            start: 10.0,
            end: 75.0,
        }
    }
}

/// Configuration handed to the render lane every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    /// Filter applied to every bound texture when magnified.
    pub mag_filter: FilterMode,
    /// Filter applied to every bound texture when minified.
    pub min_filter: FilterMode,
    /// LOD bias applied to every bound texture.
    pub lod_bias: f32,
    /// Fog for this frame; `None` leaves fog uniforms untouched.
    pub fog: Option<Fog>,
}

impl RenderParams {
    /// The sampler state every texture unit receives this frame.
    pub fn sampler_state(&self) -> SamplerState {
        SamplerState {
            mag_filter: self.mag_filter,
            min_filter: self.min_filter,
            lod_bias: self.lod_bias,
        }
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::LinearMipmapLinear,
            lod_bias: 0.0,
            fog: None,
        }
    }
}
