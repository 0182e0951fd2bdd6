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

//! Builds GPU-backed model assets from procedural cubes and model files.

use std::path::Path;
use std::sync::Arc;

use palestra_core::math::Vec4;
use palestra_core::renderer::{
    BufferId, FilterMode, GraphicsDevice, ProgramDescriptor, ProgramId, ResourceError,
    ShaderError, ShaderInterface, Texture, VertexArrayId, VertexAttribute, WrapMode,
    ATTRIB_NORMAL, ATTRIB_POSITION, ATTRIB_TEX_COORD,
};
use palestra_data::assets::{Mesh, ModelAsset};

use super::{
    create_cube_map_placeholder, create_texture, cube_vertices, loader_for_path, AssetLoaderLane,
    BuildError, Facing, ImportError, ImportedMesh, ImportedModel, ResourceLocator,
    ResourceResolver, TextureLoaderLane, FLOATS_PER_VERTEX,
};
use crate::render_lane::{scene_interface, FRAGMENT_ENTRY_POINT, VERTEX_ENTRY_POINT};

/// Turns vertex data, shader files and images into [`ModelAsset`]s.
///
/// Every mesh gets its own program, so uniform values set while drawing one
/// mesh never leak into another.
pub struct ModelBuilder {
    device: Arc<dyn GraphicsDevice>,
    locator: Arc<ResourceLocator>,
    interface: ShaderInterface,
}

impl ModelBuilder {
    /// Creates a builder that allocates on `device` and reads files through
    /// `locator`.
    pub fn new(device: Arc<dyn GraphicsDevice>, locator: ResourceLocator) -> Self {
        Self {
            device,
            locator: Arc::new(locator),
            interface: scene_interface(),
        }
    }

    /// The locator files are read through.
    pub fn locator(&self) -> &ResourceLocator {
        &self.locator
    }

    /// A unit cube with outward normals.
    pub fn build_cube(&self, vs: &str, fs: &str, diffuse: Vec4) -> Result<ModelAsset, BuildError> {
        self.build_single_mesh(vs, fs, &cube_vertices(Facing::Outward), diffuse)
    }

    /// A unit cube with inward normals, for enclosing the viewer.
    pub fn build_cube_inward(
        &self,
        vs: &str,
        fs: &str,
        diffuse: Vec4,
    ) -> Result<ModelAsset, BuildError> {
        self.build_single_mesh(vs, fs, &cube_vertices(Facing::Inward), diffuse)
    }

    /// Imports every sub-mesh of `file`, each with its own program and the
    /// material found in the file.
    ///
    /// A file that cannot be read or parsed is logged and yields an asset with
    /// no meshes. Shader failures are still errors.
    pub fn import_model(&self, file: &str, vs: &str, fs: &str) -> Result<ModelAsset, BuildError> {
        let imported = match self.read_model(file) {
            Ok(model) => model,
            Err(e) => {
                log::error!("Failed to import model '{file}': {e}");
                return Ok(ModelAsset::new());
            }
        };

        let mut asset = ModelAsset::new();
        for sub_mesh in &imported.meshes {
            asset.push_mesh(self.mesh_from_import(vs, fs, sub_mesh)?);
        }
        log::info!("Imported '{file}' ({} meshes)", asset.meshes().len());
        Ok(asset)
    }

    /// Loads `image_file`, appends it to mesh `mesh_index` and binds `uv`
    /// (two floats per vertex) to the mesh's texture-coordinate attribute.
    pub fn add_texture(
        &self,
        asset: &mut ModelAsset,
        mesh_index: usize,
        image_file: &str,
        uv: &[f32],
        filter: FilterMode,
        wrap: WrapMode,
    ) -> Result<(), BuildError> {
        let mesh = asset.mesh_mut(mesh_index)?;
        let expected = 2 * mesh.draw_count as usize;
        if uv.len() != expected {
            return Err(BuildError::UvCountMismatch {
                expected,
                actual: uv.len(),
            });
        }
        let location = self.require_attribute(mesh.program, ATTRIB_TEX_COORD, image_file)?;

        let image = self
            .locator
            .read(image_file)
            .and_then(|bytes| TextureLoaderLane.load(&bytes))
            .map_err(|source| BuildError::Texture {
                file: image_file.to_string(),
                source,
            })?;
        let texture = create_texture(self.device.as_ref(), image_file, image, filter, wrap)?;
        mesh.textures.push(texture);

        let buffer = self
            .device
            .create_vertex_buffer(&format!("{image_file} uv"), uv)?;
        self.device.bind_vertex_attribute(
            mesh.vertex_array,
            buffer,
            VertexAttribute {
                location,
                components: 2,
                stride: 2,
                offset: 0,
            },
        )?;
        mesh.tex_coord_buffer = Some(buffer);
        Ok(())
    }

    /// An empty 64x64 cube map.
    pub fn cube_map_placeholder(&self) -> Result<Texture, BuildError> {
        Ok(create_cube_map_placeholder(self.device.as_ref())?)
    }

    /// Reads and compiles the `vs` + `fs` pair.
    pub fn load_program(&self, vs: &str, fs: &str) -> Result<ProgramId, BuildError> {
        let vertex_source = self.read_shader(vs)?;
        let fragment_source = self.read_shader(fs)?;
        let label = format!("{vs} + {fs}");

        let program = self
            .device
            .create_program(&ProgramDescriptor {
                label: &label,
                vertex_source: &vertex_source,
                vertex_entry_point: VERTEX_ENTRY_POINT,
                fragment_source: &fragment_source,
                fragment_entry_point: FRAGMENT_ENTRY_POINT,
                interface: &self.interface,
            })
            .map_err(|e| match e {
                ResourceError::Shader(source) => BuildError::Shader {
                    label: label.clone(),
                    source,
                },
                other => BuildError::Resource(other),
            })?;
        log::debug!("Loaded program {program:?} from '{label}'");
        Ok(program)
    }

    fn read_shader(&self, file: &str) -> Result<String, BuildError> {
        self.locator.read_to_string(file).map_err(|e| {
            BuildError::from(ShaderError::LoadError {
                path: self.locator.resolve(file).display().to_string(),
                source_error: e.to_string(),
            })
        })
    }

    fn read_model(&self, file: &str) -> Result<ImportedModel, ImportError> {
        let resolver: Arc<dyn ResourceResolver> = self.locator.clone();
        let loader = loader_for_path(Path::new(file), resolver)?;
        let bytes = self.locator.read(file)?;
        loader.load(&bytes)
    }

    fn build_single_mesh(
        &self,
        vs: &str,
        fs: &str,
        vertices: &[f32],
        diffuse: Vec4,
    ) -> Result<ModelAsset, BuildError> {
        let mut mesh = self.create_mesh(vs, fs, vertices)?;
        mesh.diffuse_color = diffuse;
        let mut asset = ModelAsset::new();
        asset.push_mesh(mesh);
        Ok(asset)
    }

    fn mesh_from_import(
        &self,
        vs: &str,
        fs: &str,
        imported: &ImportedMesh,
    ) -> Result<Mesh, BuildError> {
        let mut mesh = self.create_mesh(vs, fs, &imported.vertices)?;
        let material = &imported.material;
        if let Some(ambient) = material.ambient {
            mesh.ambient_color = ambient;
        }
        if let Some(diffuse) = material.diffuse {
            mesh.diffuse_color = diffuse;
        }
        if let Some(specular) = material.specular {
            mesh.specular_color = specular;
        }
        // Zero means the file left shininess unspecified.
        if let Some(shininess) = material.shininess.filter(|&s| s != 0.0) {
            mesh.shininess = shininess;
        }
        Ok(mesh)
    }

    /// Uploads position + normal data and binds it to a fresh program.
    fn create_mesh(&self, vs: &str, fs: &str, vertices: &[f32]) -> Result<Mesh, BuildError> {
        let program = self.load_program(vs, fs)?;
        let label = format!("{vs} + {fs}");
        let position = self.require_attribute(program, ATTRIB_POSITION, &label)?;
        let normal = self.require_attribute(program, ATTRIB_NORMAL, &label)?;

        let buffer = self.device.create_vertex_buffer(&label, vertices)?;
        let vertex_array = self.device.create_vertex_array(program)?;
        self.bind_interleaved(vertex_array, buffer, position, 0)?;
        self.bind_interleaved(vertex_array, buffer, normal, 3)?;

        let draw_count = (vertices.len() / FLOATS_PER_VERTEX) as u32;
        Ok(Mesh::new(program, buffer, vertex_array, draw_count))
    }

    fn bind_interleaved(
        &self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
        location: u32,
        offset: u32,
    ) -> Result<(), ResourceError> {
        self.device.bind_vertex_attribute(
            vertex_array,
            buffer,
            VertexAttribute {
                location,
                components: 3,
                stride: FLOATS_PER_VERTEX as u32,
                offset,
            },
        )
    }

    fn require_attribute(
        &self,
        program: ProgramId,
        attribute: &'static str,
        context: &str,
    ) -> Result<u32, BuildError> {
        self.device
            .attribute_location(program, attribute)
            .ok_or_else(|| BuildError::MissingAttribute {
                program: context.to_string(),
                attribute,
            })
    }
}

impl std::fmt::Debug for ModelBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBuilder")
            .field("device", &self.device)
            .field("resources", &self.locator.root())
            .finish()
    }
}
