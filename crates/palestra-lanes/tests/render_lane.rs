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

mod common;

use common::{Command, RecordingRecorder};
use palestra_core::math::{Mat4, Vec3, Vec4};
use palestra_core::renderer::{
    BufferId, FilterMode, Fog, FogEquation, PrimitiveTopology, ProgramId, RenderParams, Texture,
    TextureId, UniformValue, VertexArrayId,
};
use palestra_data::assets::{Mesh, ModelAsset};
use palestra_data::scene::{default_lights, Camera, ModelInstance};
use palestra_data::Scene;
use palestra_lanes::render_lane::{LitInstanceLane, RenderLane, MAX_LIGHTS, MAX_TEXTURES};

fn mesh(program: usize, textures: usize) -> Mesh {
    let mut mesh = Mesh::new(ProgramId(program), BufferId(program), VertexArrayId(program), 36);
    mesh.textures = (0..textures)
        .map(|i| Texture {
            id: TextureId(100 + i),
            original_width: 64.0,
            original_height: 64.0,
        })
        .collect();
    mesh
}

fn scene_with(meshes: Vec<Mesh>) -> Scene {
    let mut asset = ModelAsset::new();
    for m in meshes {
        asset.push_mesh(m);
    }
    let mut scene = Scene::new(Camera::default());
    let handle = scene.add_asset(asset);
    scene
        .add_instance(ModelInstance::new(
            handle,
            Mat4::from_translation(Vec3::new(0.0, -6.5, 0.0)),
        ))
        .unwrap();
    scene
}

fn render_once(scene: &mut Scene, params: &RenderParams) -> RecordingRecorder {
    let mut recorder = RecordingRecorder::default();
    LitInstanceLane::new().render(scene, params, &mut recorder);
    recorder
}

#[test]
fn test_mesh_draw_is_bracketed_by_program_and_vertex_array() {
    let mut scene = scene_with(vec![mesh(3, 0)]);
    let recorder = render_once(&mut scene, &RenderParams::default());

    let cmds = &recorder.commands;
    assert_eq!(cmds.first(), Some(&Command::UseProgram(ProgramId(3))));
    let n = cmds.len();
    assert_eq!(
        &cmds[n - 4..],
        &[
            Command::BindVertexArray(VertexArrayId(3)),
            Command::Draw(PrimitiveTopology::TriangleList, 0, 36),
            Command::UnbindVertexArray,
            Command::StopUsingProgram,
        ]
    );
}

#[test]
fn test_transforms_and_camera_position_are_uploaded() {
    let mut scene = scene_with(vec![mesh(0, 0)]);
    scene
        .camera_mut()
        .set_position(Vec3::new(0.0, 13.0, 25.0));
    let expected_camera = scene.camera().matrix();
    let recorder = render_once(&mut scene, &RenderParams::default());

    assert_eq!(
        recorder.uniform_values("camera"),
        vec![UniformValue::Mat4(expected_camera)]
    );
    assert_eq!(
        recorder.uniform_values("model"),
        vec![UniformValue::Mat4(Mat4::from_translation(Vec3::new(0.0, -6.5, 0.0)))]
    );
    assert_eq!(
        recorder.uniform_values("cameraPosition"),
        vec![UniformValue::Vec3(Vec3::new(0.0, 13.0, 25.0))]
    );
}

#[test]
fn test_untextured_mesh_binds_nothing() {
    let mut scene = scene_with(vec![mesh(0, 0)]);
    let recorder = render_once(&mut scene, &RenderParams::default());

    assert!(recorder.texture_binds().is_empty());
    assert!(recorder.uniform_values("useTexture").is_empty());
    assert!(recorder.uniform_values("numTextures").is_empty());
}

#[test]
fn test_three_textures_bind_units_in_order() {
    let mut scene = scene_with(vec![mesh(0, 3)]);
    let params = RenderParams {
        mag_filter: FilterMode::Nearest,
        min_filter: FilterMode::NearestMipmapLinear,
        lod_bias: -0.5,
        fog: None,
    };
    let recorder = render_once(&mut scene, &params);

    assert_eq!(
        recorder.texture_binds(),
        vec![(0, TextureId(100)), (1, TextureId(101)), (2, TextureId(102))]
    );
    assert_eq!(recorder.uniform_values("useTexture"), vec![UniformValue::Float(1.0)]);
    assert_eq!(recorder.uniform_values("numTextures"), vec![UniformValue::Int(3)]);
    for i in 0..3 {
        assert_eq!(
            recorder.uniform_values(&format!("tex[{i}]")),
            vec![UniformValue::Int(i)]
        );
    }
    for cmd in &recorder.commands {
        if let Command::BindTexture(_, _, sampler) = cmd {
            assert_eq!(*sampler, params.sampler_state());
        }
    }
}

#[test]
fn test_material_uniforms() {
    let mut m = mesh(0, 0);
    m.diffuse_color = Vec4::new(0.5, 0.25, 1.0, 1.0);
    m.shininess = 32.0;
    let mut scene = scene_with(vec![m]);
    let recorder = render_once(&mut scene, &RenderParams::default());

    assert_eq!(
        recorder.uniform_values("materialDiffuseColor"),
        vec![UniformValue::Vec4(Vec4::new(0.5, 0.25, 1.0, 1.0))]
    );
    assert_eq!(
        recorder.uniform_values("materialAmbientColor"),
        vec![UniformValue::Vec4(Vec4::ONE)]
    );
    assert_eq!(
        recorder.uniform_values("materialShininess"),
        vec![UniformValue::Float(32.0)]
    );
}

#[test]
fn test_every_light_is_uploaded_by_index() {
    let mut scene = scene_with(vec![mesh(0, 0)]);
    let recorder = render_once(&mut scene, &RenderParams::default());
    let lights = default_lights();

    assert_eq!(recorder.uniform_values("numLights"), vec![UniformValue::Int(8)]);
    assert_eq!(
        recorder.uniform_values("lights[0].position"),
        vec![UniformValue::Vec4(lights[0].position)]
    );
    assert_eq!(
        recorder.uniform_values("lights[7].attenuation"),
        vec![UniformValue::Float(lights[7].attenuation)]
    );
    assert_eq!(
        recorder.uniform_values("lights[4].coneDirection"),
        vec![UniformValue::Vec3(lights[4].cone_direction)]
    );
    assert!(recorder.uniform_values("lights[8].position").is_empty());
    let light_uniforms = recorder
        .uniform_names()
        .into_iter()
        .filter(|n| n.starts_with("lights["))
        .count();
    assert_eq!(light_uniforms, 8 * 6);
}

#[test]
fn test_strobe_alternates_across_frames() {
    let mut scene = scene_with(vec![mesh(0, 0)]);
    let params = RenderParams::default();
    let colors: Vec<UniformValue> = (0..3)
        .flat_map(|_| render_once(&mut scene, &params).uniform_values("lights[1].intensities"))
        .collect();

    assert_eq!(
        colors,
        vec![
            UniformValue::Vec3(Vec3::new(1.0, 0.0, 0.0)),
            UniformValue::Vec3(Vec3::new(1.0, 1.0, 1.0)),
            UniformValue::Vec3(Vec3::new(1.0, 0.0, 0.0)),
        ]
    );
}

#[test]
fn test_strobe_flips_per_mesh() {
    let mut scene = scene_with(vec![mesh(0, 0), mesh(1, 0)]);
    let recorder = render_once(&mut scene, &RenderParams::default());
    assert_eq!(
        recorder.uniform_values("lights[1].intensities"),
        vec![
            UniformValue::Vec3(Vec3::new(1.0, 0.0, 0.0)),
            UniformValue::Vec3(Vec3::new(1.0, 1.0, 1.0)),
        ]
    );
}

#[test]
fn test_no_fog_uniforms_without_fog() {
    let mut scene = scene_with(vec![mesh(0, 1)]);
    let recorder = render_once(&mut scene, &RenderParams::default());
    assert!(recorder.uniform_names().iter().all(|n| !n.starts_with("fog")));
}

#[test]
fn test_fog_uniforms_with_fog() {
    let mut scene = scene_with(vec![mesh(0, 0)]);
    let fog = Fog {
        equation: FogEquation::Linear,
        ..Fog::default()
    };
    let params = RenderParams {
        fog: Some(fog),
        ..RenderParams::default()
    };
    let recorder = render_once(&mut scene, &params);

    assert_eq!(recorder.uniform_values("fog.eq"), vec![UniformValue::Int(2)]);
    assert_eq!(recorder.uniform_values("fog.density"), vec![UniformValue::Float(0.04)]);
    assert_eq!(recorder.uniform_values("fog.start"), vec![UniformValue::Float(10.0)]);
    assert_eq!(recorder.uniform_values("fog.end"), vec![UniformValue::Float(75.0)]);
    assert_eq!(
        recorder.uniform_values("fog.color"),
        vec![UniformValue::Vec4(Vec4::new(0.5, 0.5, 0.5, 1.0))]
    );
}

#[test]
fn test_instances_and_meshes_draw_in_insertion_order() {
    let mut scene = Scene::default();
    let mut court = ModelAsset::new();
    court.push_mesh(mesh(1, 0));
    let mut ball = ModelAsset::new();
    let mut first = mesh(2, 0);
    first.draw_count = 6;
    let mut second = mesh(3, 0);
    second.draw_start = 6;
    second.draw_count = 12;
    ball.push_mesh(first);
    ball.push_mesh(second);

    let court = scene.add_asset(court);
    let ball = scene.add_asset(ball);
    scene.add_instance(ModelInstance::new(ball, Mat4::IDENTITY)).unwrap();
    scene.add_instance(ModelInstance::new(court, Mat4::IDENTITY)).unwrap();

    let recorder = render_once(&mut scene, &RenderParams::default());
    let programs: Vec<ProgramId> = recorder
        .commands
        .iter()
        .filter_map(|c| match c {
            Command::UseProgram(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(programs, vec![ProgramId(2), ProgramId(3), ProgramId(1)]);
    assert_eq!(
        recorder.draws(),
        vec![
            (PrimitiveTopology::TriangleList, 0, 6),
            (PrimitiveTopology::TriangleList, 6, 12),
            (PrimitiveTopology::TriangleList, 0, 36),
        ]
    );
}

#[test]
fn test_empty_asset_records_nothing() {
    let mut scene = scene_with(Vec::new());
    let params = RenderParams::default();
    for _ in 0..3 {
        assert!(render_once(&mut scene, &params).commands.is_empty());
    }

    // The strobe only advances when a mesh is drawn.
    let handle = scene.instances()[0].asset;
    scene.asset_mut(handle).unwrap().push_mesh(mesh(0, 0));
    let recorder = render_once(&mut scene, &params);
    assert_eq!(
        recorder.uniform_values("lights[1].intensities"),
        vec![UniformValue::Vec3(Vec3::new(1.0, 0.0, 0.0))]
    );
}

#[test]
fn test_lights_beyond_program_capacity_are_dropped() {
    let mut scene = scene_with(vec![mesh(0, 0)]);
    let mut asset = ModelAsset::new();
    asset.push_mesh(mesh(1, 0));
    let handle = scene.add_asset(asset);
    let lights: Vec<_> = default_lights().into_iter().cycle().take(MAX_LIGHTS + 1).collect();
    scene
        .add_instance(ModelInstance::with_lights(handle, Mat4::IDENTITY, lights))
        .unwrap();
    let recorder = render_once(&mut scene, &RenderParams::default());

    assert_eq!(
        recorder.uniform_values("numLights"),
        vec![UniformValue::Int(8), UniformValue::Int(MAX_LIGHTS as i32)]
    );
    assert_eq!(recorder.uniform_values("lights[15].position").len(), 1);
    assert!(recorder
        .uniform_names()
        .iter()
        .all(|n| !n.starts_with("lights[16]")));
}

#[test]
fn test_textures_beyond_sampler_array_are_not_bound() {
    let mut scene = scene_with(vec![mesh(0, MAX_TEXTURES + 1)]);
    let recorder = render_once(&mut scene, &RenderParams::default());

    assert_eq!(
        recorder.texture_binds(),
        vec![
            (0, TextureId(100)),
            (1, TextureId(101)),
            (2, TextureId(102)),
            (3, TextureId(103)),
        ]
    );
    assert_eq!(
        recorder.uniform_values("numTextures"),
        vec![UniformValue::Int(MAX_TEXTURES as i32)]
    );
    assert!(recorder.uniform_values("tex[4]").is_empty());
}
