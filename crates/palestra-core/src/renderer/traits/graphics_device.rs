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

//! The resource-creation half of the renderer contract.

use crate::renderer::api::{
    BufferId, CubeMapDescriptor, ProgramDescriptor, ProgramId, Texture2dDescriptor, TextureId,
    VertexArrayId, VertexAttribute,
};
use crate::renderer::error::ResourceError;

/// Creates and owns GPU resources.
///
/// Every method takes `&self`: implementations keep their resource tables
/// behind interior mutability so the device can be shared as
/// `Arc<dyn GraphicsDevice>` between the asset lanes and the render system.
/// All creation happens at load time, on the thread that renders.
pub trait GraphicsDevice: Send + Sync + std::fmt::Debug {
    /// Compiles and links a vertex + fragment program.
    ///
    /// ## Errors
    /// Returns [`ResourceError::Shader`] if either stage fails to compile.
    fn create_program(&self, descriptor: &ProgramDescriptor<'_>) -> Result<ProgramId, ResourceError>;

    /// Looks up an attribute location by name, `None` if the program has no
    /// such attribute.
    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<u32>;

    /// Uploads a static float buffer.
    fn create_vertex_buffer(&self, label: &str, data: &[f32]) -> Result<BufferId, ResourceError>;

    /// Creates an empty vertex array for `program`.
    fn create_vertex_array(&self, program: ProgramId) -> Result<VertexArrayId, ResourceError>;

    /// Binds `buffer` to one attribute location of `vertex_array`.
    ///
    /// Rebinding a location replaces the previous buffer.
    fn bind_vertex_attribute(
        &self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
        attribute: VertexAttribute,
    ) -> Result<(), ResourceError>;

    /// Creates a 2D texture from a prepared mip chain.
    fn create_texture_2d(&self, descriptor: &Texture2dDescriptor<'_>) -> Result<TextureId, ResourceError>;

    /// Creates an empty six-face cube map.
    fn create_cube_map(&self, descriptor: &CubeMapDescriptor<'_>) -> Result<TextureId, ResourceError>;
}
