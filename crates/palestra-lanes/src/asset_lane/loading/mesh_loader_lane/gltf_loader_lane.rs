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

//! glTF / GLB import, with embedded, data-URI and external buffers.

use std::sync::Arc;

use base64::Engine;
use gltf::mesh::Mode;
use palestra_core::math::Vec4;

use super::{
    flatten_triangles, AssetLoaderLane, ImportError, ImportedMaterial, ImportedMesh,
    ImportedModel, ResourceResolver,
};

/// Lane for loading glTF meshes, configured with a resource resolver for
/// external buffers.
#[derive(Clone)]
pub struct GltfLoaderLane {
    resolver: Arc<dyn ResourceResolver>,
}

impl GltfLoaderLane {
    /// Creates a new glTF loader lane with the given resource resolver.
    pub fn new(resolver: Arc<dyn ResourceResolver>) -> Self {
        Self { resolver }
    }
}

impl AssetLoaderLane<ImportedModel> for GltfLoaderLane {
    /// Every triangle primitive of every mesh becomes one [`ImportedMesh`].
    fn load(&self, bytes: &[u8]) -> Result<ImportedModel, ImportError> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let buffer_data = self.load_buffer_data(&gltf)?;

        let mut meshes = Vec::new();
        for mesh in gltf.document.meshes() {
            for primitive in mesh.primitives() {
                if primitive.mode() != Mode::Triangles {
                    log::warn!(
                        "Skipping {:?} primitive of glTF mesh {:?}",
                        primitive.mode(),
                        mesh.name()
                    );
                    continue;
                }

                let reader =
                    primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
                let positions: Vec<[f32; 3]> = reader
                    .read_positions()
                    .ok_or_else(|| {
                        ImportError::Malformed("vertex positions attribute not found".to_string())
                    })?
                    .collect();
                let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(Iterator::collect);
                let indices: Vec<u32> = match reader.read_indices() {
                    Some(indices) => indices.into_u32().collect(),
                    None => (0..positions.len() as u32).collect(),
                };

                let vertices = flatten_triangles(&positions, normals.as_deref(), &indices)?;
                let [r, g, b, a] = primitive
                    .material()
                    .pbr_metallic_roughness()
                    .base_color_factor();
                meshes.push(ImportedMesh {
                    vertices,
                    material: ImportedMaterial {
                        diffuse: Some(Vec4::new(r, g, b, a)),
                        ..Default::default()
                    },
                });
            }
        }

        Ok(ImportedModel { meshes })
    }
}

impl GltfLoaderLane {
    fn load_buffer_data(&self, gltf: &gltf::Gltf) -> Result<Vec<Vec<u8>>, ImportError> {
        let mut buffer_data = Vec::new();
        for buffer in gltf.buffers() {
            match buffer.source() {
                gltf::buffer::Source::Bin => {
                    let blob = gltf.blob.as_deref().ok_or_else(|| {
                        ImportError::Malformed(
                            "GLB file references binary chunk but it is missing".to_string(),
                        )
                    })?;
                    buffer_data.push(blob.to_vec());
                }
                gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                    buffer_data.push(decode_data_uri(uri)?);
                }
                gltf::buffer::Source::Uri(uri) => {
                    buffer_data.push(self.resolver.resolve_bytes(uri)?);
                }
            }
        }
        Ok(buffer_data)
    }
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ImportError> {
    let payload = uri
        .strip_prefix("data:application/octet-stream;base64,")
        .or_else(|| uri.strip_prefix("data:application/gltf-buffer;base64,"))
        .ok_or_else(|| ImportError::Resource {
            uri: uri.chars().take(48).collect(),
            reason: "unsupported data URI format".to_string(),
        })?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ImportError::Resource {
            uri: uri.chars().take(48).collect(),
            reason: e.to_string(),
        })
}
