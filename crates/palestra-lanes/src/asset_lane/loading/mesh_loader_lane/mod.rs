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

//! Model file import: OBJ and glTF into flat, triangle-list vertex data.

mod gltf_loader_lane;
mod obj_loader_lane;
mod resource_resolver;

pub use gltf_loader_lane::*;
pub use obj_loader_lane::*;
pub use resource_resolver::*;

use std::path::Path;
use std::sync::Arc;

use palestra_core::math::{Vec3, Vec4};

use super::{AssetLoaderLane, ImportError};
use crate::asset_lane::FLOATS_PER_VERTEX;

/// Material values found in a model file. `None` means the file does not
/// specify the value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImportedMaterial {
    /// Ambient color.
    pub ambient: Option<Vec4>,
    /// Diffuse color.
    pub diffuse: Option<Vec4>,
    /// Specular color.
    pub specular: Option<Vec4>,
    /// Specular exponent.
    pub shininess: Option<f32>,
}

/// One sub-mesh, already flattened to a non-indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedMesh {
    /// Position + normal per vertex, three vertices per face.
    pub vertices: Vec<f32>,
    /// The sub-mesh's material.
    pub material: ImportedMaterial,
}

impl ImportedMesh {
    /// Number of vertices, i.e. three times the number of faces.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }
}

/// Every sub-mesh of a model file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedModel {
    /// The sub-meshes.
    pub meshes: Vec<ImportedMesh>,
}

/// Common trait for all model loaders.
pub trait MeshLoaderLane: AssetLoaderLane<ImportedModel> + Send + Sync + 'static {}

impl<T> MeshLoaderLane for T where T: AssetLoaderLane<ImportedModel> + Send + Sync + 'static {}

/// Picks a loader from the file extension (case-insensitive).
pub fn loader_for_path(
    path: &Path,
    resolver: Arc<dyn ResourceResolver>,
) -> Result<Box<dyn MeshLoaderLane>, ImportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "obj" => Ok(Box::new(ObjLoaderLane::new(resolver))),
        "gltf" | "glb" => Ok(Box::new(GltfLoaderLane::new(resolver))),
        _ => Err(ImportError::UnsupportedExtension(ext)),
    }
}

/// Expands indexed triangles into position + normal vertex data.
///
/// When `normals` is missing, or does not match `positions`, every triangle
/// gets its flat face normal.
pub(crate) fn flatten_triangles(
    positions: &[[f32; 3]],
    normals: Option<&[[f32; 3]]>,
    indices: &[u32],
) -> Result<Vec<f32>, ImportError> {
    if indices.len() % 3 != 0 {
        return Err(ImportError::Malformed(format!(
            "{} indices do not form whole triangles",
            indices.len()
        )));
    }
    let normals = normals.filter(|n| n.len() == positions.len());
    let fetch = |i: u32| {
        positions.get(i as usize).copied().ok_or_else(|| {
            ImportError::Malformed(format!(
                "index {i} out of range for {} positions",
                positions.len()
            ))
        })
    };

    let mut out = Vec::with_capacity(indices.len() * FLOATS_PER_VERTEX);
    for tri in indices.chunks_exact(3) {
        let corners = [fetch(tri[0])?, fetch(tri[1])?, fetch(tri[2])?];
        let flat = normals.is_none().then(|| {
            let [a, b, c] = corners.map(Vec3::from);
            (b - a).cross(c - a).normalize().to_array()
        });
        for (k, position) in corners.iter().enumerate() {
            let normal = match normals {
                Some(n) => n[tri[k] as usize],
                None => flat.unwrap_or_default(),
            };
            out.extend_from_slice(position);
            out.extend_from_slice(&normal);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: [[f32; 3]; 4] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ];

    #[test]
    fn test_flatten_generates_flat_normals() {
        let out = flatten_triangles(&QUAD, None, &[0, 1, 2, 0, 2, 3]).unwrap();
        assert_eq!(out.len(), 6 * FLOATS_PER_VERTEX);
        for v in out.chunks_exact(FLOATS_PER_VERTEX) {
            assert_eq!(&v[3..], &[0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_flatten_keeps_source_normals() {
        let normals = [[0.0, 0.0, -1.0]; 4];
        let out = flatten_triangles(&QUAD, Some(&normals), &[2, 1, 0]).unwrap();
        assert_eq!(&out[..6], &[1.0, 1.0, 0.0, 0.0, 0.0, -1.0]);
    }

    #[test]
    fn test_flatten_rejects_bad_indices() {
        assert!(matches!(
            flatten_triangles(&QUAD, None, &[0, 1, 7]),
            Err(ImportError::Malformed(_))
        ));
        assert!(matches!(
            flatten_triangles(&QUAD, None, &[0, 1]),
            Err(ImportError::Malformed(_))
        ));
    }

    #[test]
    fn test_loader_for_path() {
        let resolver: Arc<dyn ResourceResolver> = Arc::new(NullResolver);
        assert!(loader_for_path(Path::new("Volleyball.OBJ"), resolver.clone()).is_ok());
        assert!(loader_for_path(Path::new("bench.glb"), resolver.clone()).is_ok());
        assert!(matches!(
            loader_for_path(Path::new("bench.fbx"), resolver),
            Err(ImportError::UnsupportedExtension(ext)) if ext == "fbx"
        ));
    }

    struct NullResolver;

    impl ResourceResolver for NullResolver {
        fn resolve_bytes(&self, uri: &str) -> Result<Vec<u8>, ImportError> {
            Err(ImportError::Resource {
                uri: uri.to_string(),
                reason: "no resources in tests".to_string(),
            })
        }
    }
}
