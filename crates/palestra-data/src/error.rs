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

use thiserror::Error;

use crate::scene::AssetHandle;

/// Errors raised when manipulating scene data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The asset has no mesh to operate on.
    #[error("model asset has no meshes")]
    EmptyAsset,
    /// A texture index is past the end of the mesh's texture list.
    #[error("texture index {index} out of range for a mesh with {len} textures")]
    TextureIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of textures on the mesh.
        len: usize,
    },
    /// A mesh index is past the end of the asset's mesh list.
    #[error("mesh index {index} out of range for an asset with {len} meshes")]
    MeshIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of meshes on the asset.
        len: usize,
    },
    /// The handle does not refer to an asset of this scene.
    #[error("unknown asset handle {0:?}")]
    UnknownAsset(AssetHandle),
}
