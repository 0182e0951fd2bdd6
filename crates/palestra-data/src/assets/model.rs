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

use palestra_core::renderer::api::Texture;

use super::Mesh;
use crate::error::SceneError;

/// A texture taken out of mesh 0, with the position it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SwappedTexture {
    index: usize,
    texture: Texture,
}

/// An ordered list of meshes forming one loadable object.
///
/// Meshes are drawn in insertion order. Many instances may share one asset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelAsset {
    meshes: Vec<Mesh>,
    swap: Option<SwappedTexture>,
}

impl ModelAsset {
    /// Creates an asset with no meshes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a mesh; it will be drawn after every mesh already present.
    pub fn push_mesh(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    /// The meshes, in draw order.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Mutable access to one mesh.
    pub fn mesh_mut(&mut self, index: usize) -> Result<&mut Mesh, SceneError> {
        let len = self.meshes.len();
        self.meshes
            .get_mut(index)
            .ok_or(SceneError::MeshIndexOutOfRange { index, len })
    }

    /// Returns `true` if the asset has no meshes (e.g. after a failed import).
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Removes texture `index` from mesh 0 and holds it aside.
    ///
    /// Only one texture is held at a time: a texture already held from an
    /// earlier call is dropped without being restored.
    ///
    /// # Errors
    /// [`SceneError::EmptyAsset`] if there is no mesh,
    /// [`SceneError::TextureIndexOutOfRange`] if `index` is past the end.
    pub fn save_texture_to_swap(&mut self, index: usize) -> Result<(), SceneError> {
        let mesh = self.meshes.first_mut().ok_or(SceneError::EmptyAsset)?;
        let len = mesh.textures.len();
        if index >= len {
            return Err(SceneError::TextureIndexOutOfRange { index, len });
        }
        let texture = mesh.textures.remove(index);
        if let Some(previous) = self.swap.replace(SwappedTexture { index, texture }) {
            log::debug!(
                "Discarding held texture {:?} (was at index {})",
                previous.texture.id,
                previous.index
            );
        }
        Ok(())
    }

    /// Puts the held texture back at the index it was taken from.
    ///
    /// Returns `true` if a texture was restored, `false` if nothing was held.
    pub fn flush_swap(&mut self) -> bool {
        let Some(SwappedTexture { index, texture }) = self.swap.take() else {
            return false;
        };
        match self.meshes.first_mut() {
            Some(mesh) => {
                let at = index.min(mesh.textures.len());
                mesh.textures.insert(at, texture);
                true
            }
            None => false,
        }
    }

    /// The texture currently held aside, if any.
    pub fn swapped_texture(&self) -> Option<&Texture> {
        self.swap.as_ref().map(|s| &s.texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palestra_core::renderer::api::{BufferId, ProgramId, TextureId, VertexArrayId};

    fn texture(id: usize) -> Texture {
        Texture {
            id: TextureId(id),
            original_width: 64.0,
            original_height: 64.0,
        }
    }

    fn asset_with_textures(ids: &[usize]) -> ModelAsset {
        let mut mesh = Mesh::new(ProgramId(0), BufferId(0), VertexArrayId(0), 36);
        mesh.textures = ids.iter().copied().map(texture).collect();
        let mut asset = ModelAsset::new();
        asset.push_mesh(mesh);
        asset
    }

    fn texture_ids(asset: &ModelAsset) -> Vec<usize> {
        asset.meshes()[0].textures.iter().map(|t| t.id.0).collect()
    }

    #[test]
    fn test_swap_and_flush_round_trip() {
        let mut asset = asset_with_textures(&[10, 11, 12]);

        asset.save_texture_to_swap(1).unwrap();
        assert_eq!(texture_ids(&asset), vec![10, 12]);
        assert_eq!(asset.swapped_texture().map(|t| t.id), Some(TextureId(11)));

        assert!(asset.flush_swap());
        assert_eq!(texture_ids(&asset), vec![10, 11, 12]);
        assert!(asset.swapped_texture().is_none());
    }

    #[test]
    fn test_flush_without_swap_is_noop() {
        let mut asset = asset_with_textures(&[10, 11]);
        assert!(!asset.flush_swap());
        assert_eq!(texture_ids(&asset), vec![10, 11]);
    }

    #[test]
    fn test_second_swap_discards_first_hold() {
        let mut asset = asset_with_textures(&[10, 11, 12]);
        asset.save_texture_to_swap(0).unwrap();
        asset.save_texture_to_swap(0).unwrap();
        assert_eq!(texture_ids(&asset), vec![12]);

        asset.flush_swap();
        assert_eq!(texture_ids(&asset), vec![11, 12]);
    }

    #[test]
    fn test_swap_last_index() {
        let mut asset = asset_with_textures(&[10, 11, 12]);
        asset.save_texture_to_swap(2).unwrap();
        asset.flush_swap();
        assert_eq!(texture_ids(&asset), vec![10, 11, 12]);
    }

    #[test]
    fn test_swap_errors() {
        let mut asset = asset_with_textures(&[10]);
        assert_eq!(
            asset.save_texture_to_swap(1),
            Err(SceneError::TextureIndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            ModelAsset::new().save_texture_to_swap(0),
            Err(SceneError::EmptyAsset)
        );
    }

    #[test]
    fn test_mesh_defaults() {
        let mesh = Mesh::new(ProgramId(1), BufferId(2), VertexArrayId(3), 36);
        assert_eq!(mesh.shininess, 1.0);
        assert_eq!(mesh.draw_start, 0);
        assert_eq!(mesh.draw_count, 36);
        assert!(!mesh.is_textured());
        assert!(mesh.tex_coord_buffer.is_none());
    }
}
