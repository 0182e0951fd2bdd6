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

use palestra_core::math::Vec4;
use palestra_core::renderer::api::{
    BufferId, PrimitiveTopology, ProgramId, Texture, VertexArrayId,
};

/// One drawable batch: geometry, the program that draws it, its material and
/// its textures.
///
/// The vertex buffer holds position + normal (6 floats per vertex); the
/// optional UV buffer holds 2 floats per vertex. Both are bound to the
/// program's attributes when the mesh is built and never rebound.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Interleaved position + normal buffer.
    pub vertex_buffer: BufferId,
    /// Vertex array binding the buffers to the program's attributes.
    pub vertex_array: VertexArrayId,
    /// Texture coordinates, present once a texture has been attached.
    pub tex_coord_buffer: Option<BufferId>,
    /// The program this mesh is drawn with.
    pub program: ProgramId,
    /// Textures bound to units `0..textures.len()` when drawing.
    pub textures: Vec<Texture>,
    /// Material ambient color.
    pub ambient_color: Vec4,
    /// Material diffuse color.
    pub diffuse_color: Vec4,
    /// Material specular color.
    pub specular_color: Vec4,
    /// Specular exponent.
    pub shininess: f32,
    /// Primitive assembly mode.
    pub topology: PrimitiveTopology,
    /// First vertex drawn.
    pub draw_start: u32,
    /// Number of vertices drawn.
    pub draw_count: u32,
}

impl Mesh {
    /// Creates a mesh with the default white material and shininess 1.
    pub fn new(
        program: ProgramId,
        vertex_buffer: BufferId,
        vertex_array: VertexArrayId,
        draw_count: u32,
    ) -> Self {
        Self {
            vertex_buffer,
            vertex_array,
            tex_coord_buffer: None,
            program,
            textures: Vec::new(),
            ambient_color: Vec4::ONE,
            diffuse_color: Vec4::ONE,
            specular_color: Vec4::ONE,
            shininess: 1.0,
            topology: PrimitiveTopology::TriangleList,
            draw_start: 0,
            draw_count,
        }
    }

    /// Returns `true` if at least one texture is attached.
    pub fn is_textured(&self) -> bool {
        !self.textures.is_empty()
    }
}
