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

//! The per-frame half of the renderer contract.

use crate::renderer::api::{
    PrimitiveTopology, ProgramId, SamplerState, TextureId, UniformValue, VertexArrayId,
};

/// A stateful command sink that lives for one frame.
///
/// The model is that of a classic immediate-mode API: a program is made
/// current, named uniforms are set on it, textures are bound to numbered
/// units, and a draw consumes whatever is bound at that moment.
///
/// None of these calls report errors. Unknown uniform names, values of the
/// wrong type, or draws with no program or vertex array bound are ignored by
/// the implementation.
pub trait CommandRecorder {
    /// Makes `program` current.
    fn use_program(&mut self, program: ProgramId);

    /// Sets a uniform on the current program. Values persist on the program
    /// until overwritten.
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Binds `texture` to texture unit `unit` with the given sampling state.
    fn bind_texture(&mut self, unit: u32, texture: TextureId, sampler: SamplerState);

    /// Makes `vertex_array` current.
    fn bind_vertex_array(&mut self, vertex_array: VertexArrayId);

    /// Draws `count` vertices starting at `first`, non-indexed.
    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32);

    /// Clears the current vertex array.
    fn unbind_vertex_array(&mut self);

    /// Clears the current program.
    fn stop_using_program(&mut self);
}
