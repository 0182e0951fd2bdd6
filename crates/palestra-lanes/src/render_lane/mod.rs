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

//! Rendering lane: the per-instance, per-mesh draw path.

mod lit_instance_lane;
mod shaders;
mod uniform_names;

pub use lit_instance_lane::*;
pub use shaders::*;
pub use uniform_names::*;

use palestra_core::renderer::{CommandRecorder, RenderParams};
use palestra_data::Scene;

/// A strategy for turning a [`Scene`] into recorded draw commands.
///
/// Lanes only talk to the abstract [`CommandRecorder`]; they never see the
/// backend.
pub trait RenderLane {
    /// Human-readable identifier of the strategy.
    fn strategy_name(&self) -> &'static str;

    /// Records the whole scene for one frame.
    ///
    /// Takes the scene mutably because per-instance animation state (the
    /// strobe) advances as meshes are drawn.
    fn render(&self, scene: &mut Scene, params: &RenderParams, recorder: &mut dyn CommandRecorder);
}
