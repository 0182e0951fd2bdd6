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

use palestra_core::math::Mat4;
use palestra_core::renderer::{BufferId, ProgramId, Texture, TextureId, VertexArrayId};
use palestra_data::assets::{Mesh, ModelAsset};
use palestra_data::scene::{AssetHandle, ModelInstance, STROBE_OFF, STROBE_ON};
use palestra_data::{Scene, SceneError};

fn textured_asset(ids: &[usize]) -> ModelAsset {
    let mut mesh = Mesh::new(ProgramId(0), BufferId(0), VertexArrayId(0), 36);
    mesh.textures = ids
        .iter()
        .map(|&id| Texture {
            id: TextureId(id),
            original_width: 256.0,
            original_height: 256.0,
        })
        .collect();
    let mut asset = ModelAsset::new();
    asset.push_mesh(mesh);
    asset
}

fn mesh0_texture_ids(scene: &Scene, handle: AssetHandle) -> Vec<usize> {
    scene.asset(handle).unwrap().meshes()[0]
        .textures
        .iter()
        .map(|t| t.id.0)
        .collect()
}

#[test]
fn test_swap_through_scene_is_seen_by_every_instance() {
    let mut scene = Scene::default();
    let court = scene.add_asset(textured_asset(&[1, 2, 3]));
    scene
        .add_instance(ModelInstance::new(court, Mat4::IDENTITY))
        .unwrap();
    scene
        .add_instance(ModelInstance::new(court, Mat4::from_scale([2.0, 1.0, 2.0].into())))
        .unwrap();

    scene.asset_mut(court).unwrap().save_texture_to_swap(1).unwrap();
    assert_eq!(mesh0_texture_ids(&scene, court), vec![1, 3]);

    assert!(scene.asset_mut(court).unwrap().flush_swap());
    assert_eq!(mesh0_texture_ids(&scene, court), vec![1, 2, 3]);
}

#[test]
fn test_unknown_handle_is_an_error() {
    let mut scene = Scene::default();
    assert_eq!(
        scene.asset_mut(AssetHandle(3)).unwrap_err(),
        SceneError::UnknownAsset(AssetHandle(3))
    );
}

#[test]
fn test_each_instance_owns_its_strobe() {
    let mut scene = Scene::default();
    let cube = scene.add_asset(textured_asset(&[]));
    scene.add_instance(ModelInstance::new(cube, Mat4::IDENTITY)).unwrap();
    scene.add_instance(ModelInstance::new(cube, Mat4::IDENTITY)).unwrap();

    let (_, instances, _) = scene.render_view();
    assert_eq!(instances[0].advance_strobe(), Some(STROBE_OFF));
    assert_eq!(instances[0].advance_strobe(), Some(STROBE_ON));
    assert_eq!(instances[1].advance_strobe(), Some(STROBE_OFF));
}
