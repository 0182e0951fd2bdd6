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

//! Forward rendering of model instances under their own multi-light rigs.
//!
//! Every mesh is drawn in its own program with the full uniform set uploaded
//! by name: transforms, texture bindings, material, lights and fog. There is
//! no sorting, batching or culling; instances and meshes are drawn in the
//! order they were added.

use palestra_core::math::{Mat4, Vec3};
use palestra_core::renderer::{CommandRecorder, RenderParams, SamplerState, UniformValue};
use palestra_data::assets::Mesh;
use palestra_data::scene::ModelInstance;
use palestra_data::Scene;

use super::*;

/// Per-frame values shared by every draw.
struct FrameConstants<'a> {
    camera: Mat4,
    camera_position: Vec3,
    sampler: SamplerState,
    params: &'a RenderParams,
}

/// A lane that draws every mesh of every instance with Phong lighting from
/// the instance's lights.
#[derive(Debug, Clone)]
pub struct LitInstanceLane {
    light_names: Vec<LightUniformNames>,
    sampler_names: SamplerUniformNames,
}

impl Default for LitInstanceLane {
    fn default() -> Self {
        Self {
            light_names: LightUniformNames::table(MAX_LIGHTS),
            sampler_names: SamplerUniformNames::new(MAX_TEXTURES),
        }
    }
}

impl LitInstanceLane {
    /// Creates a lane sized for the scene program's light and sampler arrays.
    pub fn new() -> Self {
        Self::default()
    }

    fn draw_mesh(
        &self,
        mesh: &Mesh,
        instance: &mut ModelInstance,
        frame: &FrameConstants<'_>,
        recorder: &mut dyn CommandRecorder,
    ) {
        recorder.use_program(mesh.program);

        recorder.set_uniform(U_CAMERA, frame.camera.into());
        recorder.set_uniform(U_MODEL, instance.transform.into());
        recorder.set_uniform(U_CAMERA_POSITION, frame.camera_position.into());

        self.bind_textures(mesh, frame.sampler, recorder);

        recorder.set_uniform(U_MATERIAL_AMBIENT, mesh.ambient_color.into());
        recorder.set_uniform(U_MATERIAL_DIFFUSE, mesh.diffuse_color.into());
        recorder.set_uniform(U_MATERIAL_SPECULAR, mesh.specular_color.into());
        recorder.set_uniform(U_MATERIAL_SHININESS, mesh.shininess.into());

        instance.advance_strobe();
        self.upload_lights(instance, recorder);

        if let Some(fog) = &frame.params.fog {
            recorder.set_uniform(U_FOG_COLOR, fog.color.into());
            recorder.set_uniform(U_FOG_DENSITY, fog.density.into());
            recorder.set_uniform(U_FOG_EQUATION, fog.equation.code().into());
            recorder.set_uniform(U_FOG_START, fog.start.into());
            recorder.set_uniform(U_FOG_END, fog.end.into());
        }

        recorder.bind_vertex_array(mesh.vertex_array);
        recorder.draw_arrays(mesh.topology, mesh.draw_start, mesh.draw_count);

        recorder.unbind_vertex_array();
        recorder.stop_using_program();
    }

    fn bind_textures(&self, mesh: &Mesh, sampler: SamplerState, recorder: &mut dyn CommandRecorder) {
        if mesh.textures.is_empty() {
            return;
        }
        let count = mesh.textures.len().min(self.sampler_names.len());
        if count < mesh.textures.len() {
            log::trace!(
                "Mesh has {} textures, binding the first {count}",
                mesh.textures.len()
            );
        }

        recorder.set_uniform(U_USE_TEXTURE, UniformValue::Float(1.0));
        recorder.set_uniform(U_NUM_TEXTURES, UniformValue::Int(count as i32));
        for (unit, texture) in mesh.textures.iter().take(count).enumerate() {
            let Some(name) = self.sampler_names.get(unit) else {
                break;
            };
            recorder.bind_texture(unit as u32, texture.id, sampler);
            recorder.set_uniform(name, UniformValue::Int(unit as i32));
        }
    }

    fn upload_lights(&self, instance: &ModelInstance, recorder: &mut dyn CommandRecorder) {
        let count = instance.lights.len().min(self.light_names.len());
        if count < instance.lights.len() {
            log::trace!(
                "Instance has {} lights, uploading the first {count}",
                instance.lights.len()
            );
        }

        recorder.set_uniform(U_NUM_LIGHTS, UniformValue::Int(count as i32));
        for (light, names) in instance.lights.iter().zip(&self.light_names) {
            recorder.set_uniform(&names.position, light.position.into());
            recorder.set_uniform(&names.intensities, light.intensities.into());
            recorder.set_uniform(&names.attenuation, light.attenuation.into());
            recorder.set_uniform(&names.ambient_coefficient, light.ambient_coefficient.into());
            recorder.set_uniform(&names.cone_angle, light.cone_angle.into());
            recorder.set_uniform(&names.cone_direction, light.cone_direction.into());
        }
    }
}

impl RenderLane for LitInstanceLane {
    fn strategy_name(&self) -> &'static str {
        "LitInstance"
    }

    fn render(&self, scene: &mut Scene, params: &RenderParams, recorder: &mut dyn CommandRecorder) {
        let (assets, instances, camera) = scene.render_view();
        let frame = FrameConstants {
            camera: camera.matrix(),
            camera_position: camera.position(),
            sampler: params.sampler_state(),
            params,
        };

        for instance in instances.iter_mut() {
            let Some(asset) = assets.get(instance.asset.0) else {
                log::trace!("Skipping instance of unknown asset {:?}", instance.asset);
                continue;
            };
            for mesh in asset.meshes() {
                self.draw_mesh(mesh, instance, &frame, recorder);
            }
        }
    }
}
