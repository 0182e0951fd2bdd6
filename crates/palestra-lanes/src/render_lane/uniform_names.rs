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

//! Indexed uniform names, formatted once and reused every frame.

use super::{LIGHT_FIELDS, SAMPLER_ARRAY};

/// The six uniform names of `lights[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightUniformNames {
    /// `lights[i].position`
    pub position: String,
    /// `lights[i].intensities`
    pub intensities: String,
    /// `lights[i].attenuation`
    pub attenuation: String,
    /// `lights[i].ambientCoefficient`
    pub ambient_coefficient: String,
    /// `lights[i].coneAngle`
    pub cone_angle: String,
    /// `lights[i].coneDirection`
    pub cone_direction: String,
}

impl LightUniformNames {
    /// Formats the names for light `index`.
    pub fn new(index: usize) -> Self {
        let [position, intensities, attenuation, ambient_coefficient, cone_angle, cone_direction] =
            LIGHT_FIELDS.map(|(field, _)| format!("lights[{index}].{field}"));
        Self {
            position,
            intensities,
            attenuation,
            ambient_coefficient,
            cone_angle,
            cone_direction,
        }
    }

    /// Names for lights `0..count`.
    pub fn table(count: usize) -> Vec<Self> {
        (0..count).map(Self::new).collect()
    }
}

/// `tex[0]`, `tex[1]`, ... up to a fixed capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerUniformNames {
    names: Vec<String>,
}

impl SamplerUniformNames {
    /// Formats names for sampler slots `0..count`.
    pub fn new(count: usize) -> Self {
        Self {
            names: (0..count).map(|i| format!("{SAMPLER_ARRAY}[{i}]")).collect(),
        }
    }

    /// The name of slot `index`, or `None` past the capacity.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no slot is named.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
