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

//! Wavefront OBJ (+ MTL) import.

use std::io::Cursor;
use std::sync::Arc;

use ahash::AHashMap;
use palestra_core::math::Vec4;

use super::{
    flatten_triangles, AssetLoaderLane, ImportError, ImportedMaterial, ImportedMesh,
    ImportedModel, ResourceResolver,
};

/// Lane for loading OBJ models. Material libraries are fetched through the
/// resolver; a missing library leaves the meshes with default materials.
#[derive(Clone)]
pub struct ObjLoaderLane {
    resolver: Arc<dyn ResourceResolver>,
}

impl ObjLoaderLane {
    /// Creates a loader that resolves `mtllib` references with `resolver`.
    pub fn new(resolver: Arc<dyn ResourceResolver>) -> Self {
        Self { resolver }
    }
}

impl AssetLoaderLane<ImportedModel> for ObjLoaderLane {
    fn load(&self, bytes: &[u8]) -> Result<ImportedModel, ImportError> {
        let (models, materials) = tobj::load_obj_buf(
            &mut Cursor::new(bytes),
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
            |mtl_path| {
                let uri = mtl_path.to_string_lossy();
                match self.resolver.resolve_bytes(&uri) {
                    Ok(mtl) => tobj::load_mtl_buf(&mut Cursor::new(mtl)),
                    Err(e) => {
                        log::warn!("Material library '{uri}' unavailable: {e}");
                        Ok((Vec::new(), AHashMap::new()))
                    }
                }
            },
        )?;

        let materials = materials.unwrap_or_else(|e| {
            log::warn!("Ignoring OBJ materials: {e}");
            Vec::new()
        });

        let mut meshes = Vec::with_capacity(models.len());
        for model in &models {
            let mesh = &model.mesh;
            let positions: Vec<[f32; 3]> = mesh
                .positions
                .chunks_exact(3)
                .map(|p| [p[0], p[1], p[2]])
                .collect();
            let normals: Vec<[f32; 3]> = mesh
                .normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect();
            let normals = (!normals.is_empty()).then_some(normals.as_slice());

            let vertices = flatten_triangles(&positions, normals, &mesh.indices)?;
            let material = mesh
                .material_id
                .and_then(|id| materials.get(id))
                .map(convert_material)
                .unwrap_or_default();

            log::debug!(
                "OBJ sub-mesh '{}': {} faces",
                model.name,
                mesh.indices.len() / 3
            );
            meshes.push(ImportedMesh { vertices, material });
        }

        Ok(ImportedModel { meshes })
    }
}

fn convert_material(material: &tobj::Material) -> ImportedMaterial {
    let color = |c: Option<[f32; 3]>| c.map(|[r, g, b]| Vec4::new(r, g, b, 1.0));
    ImportedMaterial {
        ambient: color(material.ambient),
        diffuse: color(material.diffuse),
        specular: color(material.specular),
        shininess: material.shininess,
    }
}
