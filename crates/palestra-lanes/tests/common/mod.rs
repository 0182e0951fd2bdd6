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

//! A GPU stand-in that records every call made through the renderer traits.

#![allow(dead_code)]

use std::sync::Mutex;

use palestra_core::renderer::{
    BufferId, CommandRecorder, CubeMapDescriptor, FilterMode, GraphicsDevice, PixelFormat,
    PrimitiveTopology, ProgramDescriptor, ProgramId, ResourceError, SamplerState, ShaderError,
    ShaderInterface, Texture2dDescriptor, TextureId, UniformValue, VertexArrayId, VertexAttribute,
    WrapMode,
};

/// Marker that makes the mock reject a shader source.
pub const BROKEN_SHADER: &str = "@broken";

#[derive(Debug, Clone, PartialEq)]
pub enum TextureRecord {
    Flat {
        label: Option<String>,
        format: PixelFormat,
        filter: FilterMode,
        wrap: WrapMode,
        levels: Vec<(u32, u32)>,
        first_row: Vec<u8>,
    },
    Cube {
        size: u32,
        format: PixelFormat,
        wrap: WrapMode,
    },
}

#[derive(Debug, Default)]
pub struct DeviceState {
    pub programs: Vec<(String, ShaderInterface)>,
    pub buffers: Vec<Vec<f32>>,
    pub vertex_arrays: Vec<(ProgramId, Vec<(BufferId, VertexAttribute)>)>,
    pub textures: Vec<TextureRecord>,
}

#[derive(Debug, Default)]
pub struct RecordingDevice {
    pub state: Mutex<DeviceState>,
}

impl RecordingDevice {
    pub fn program_count(&self) -> usize {
        self.state.lock().unwrap().programs.len()
    }

    pub fn buffer(&self, id: BufferId) -> Vec<f32> {
        self.state.lock().unwrap().buffers[id.0].clone()
    }

    pub fn bindings(&self, id: VertexArrayId) -> Vec<(BufferId, VertexAttribute)> {
        self.state.lock().unwrap().vertex_arrays[id.0].1.clone()
    }

    pub fn texture(&self, id: TextureId) -> TextureRecord {
        self.state.lock().unwrap().textures[id.0].clone()
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_program(&self, descriptor: &ProgramDescriptor<'_>) -> Result<ProgramId, ResourceError> {
        if descriptor.vertex_source.contains(BROKEN_SHADER)
            || descriptor.fragment_source.contains(BROKEN_SHADER)
        {
            return Err(ShaderError::CompilationError {
                label: descriptor.label.to_string(),
                details: "rejected by mock".to_string(),
            }
            .into());
        }
        let mut state = self.state.lock().unwrap();
        state
            .programs
            .push((descriptor.label.to_string(), descriptor.interface.clone()));
        Ok(ProgramId(state.programs.len() - 1))
    }

    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        let state = self.state.lock().unwrap();
        let (_, interface) = state.programs.get(program.0)?;
        interface.attribute(name).map(|a| a.location)
    }

    fn create_vertex_buffer(&self, _label: &str, data: &[f32]) -> Result<BufferId, ResourceError> {
        let mut state = self.state.lock().unwrap();
        state.buffers.push(data.to_vec());
        Ok(BufferId(state.buffers.len() - 1))
    }

    fn create_vertex_array(&self, program: ProgramId) -> Result<VertexArrayId, ResourceError> {
        let mut state = self.state.lock().unwrap();
        state.vertex_arrays.push((program, Vec::new()));
        Ok(VertexArrayId(state.vertex_arrays.len() - 1))
    }

    fn bind_vertex_attribute(
        &self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
        attribute: VertexAttribute,
    ) -> Result<(), ResourceError> {
        let mut state = self.state.lock().unwrap();
        let (_, bindings) = state
            .vertex_arrays
            .get_mut(vertex_array.0)
            .ok_or_else(|| ResourceError::InvalidHandle(format!("{vertex_array:?}")))?;
        bindings.retain(|(_, a)| a.location != attribute.location);
        bindings.push((buffer, attribute));
        Ok(())
    }

    fn create_texture_2d(&self, descriptor: &Texture2dDescriptor<'_>) -> Result<TextureId, ResourceError> {
        let base = &descriptor.levels[0];
        let row = base.width as usize * descriptor.format.channels();
        let mut state = self.state.lock().unwrap();
        state.textures.push(TextureRecord::Flat {
            label: descriptor.label.map(str::to_string),
            format: descriptor.format,
            filter: descriptor.filter,
            wrap: descriptor.wrap,
            levels: descriptor.levels.iter().map(|l| (l.width, l.height)).collect(),
            first_row: base.pixels[..row].to_vec(),
        });
        Ok(TextureId(state.textures.len() - 1))
    }

    fn create_cube_map(&self, descriptor: &CubeMapDescriptor<'_>) -> Result<TextureId, ResourceError> {
        let mut state = self.state.lock().unwrap();
        state.textures.push(TextureRecord::Cube {
            size: descriptor.size,
            format: descriptor.format,
            wrap: descriptor.wrap,
        });
        Ok(TextureId(state.textures.len() - 1))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    UseProgram(ProgramId),
    SetUniform(String, UniformValue),
    BindTexture(u32, TextureId, SamplerState),
    BindVertexArray(VertexArrayId),
    Draw(PrimitiveTopology, u32, u32),
    UnbindVertexArray,
    StopUsingProgram,
}

#[derive(Debug, Default)]
pub struct RecordingRecorder {
    pub commands: Vec<Command>,
}

impl RecordingRecorder {
    /// Every value uploaded to `name`, in order.
    pub fn uniform_values(&self, name: &str) -> Vec<UniformValue> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::SetUniform(n, v) if n == name => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn uniform_names(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::SetUniform(n, _) => Some(n.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn texture_binds(&self) -> Vec<(u32, TextureId)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::BindTexture(unit, id, _) => Some((*unit, *id)),
                _ => None,
            })
            .collect()
    }

    pub fn draws(&self) -> Vec<(PrimitiveTopology, u32, u32)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Draw(t, first, count) => Some((*t, *first, *count)),
                _ => None,
            })
            .collect()
    }
}

impl CommandRecorder for RecordingRecorder {
    fn use_program(&mut self, program: ProgramId) {
        self.commands.push(Command::UseProgram(program));
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.commands.push(Command::SetUniform(name.to_string(), value));
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId, sampler: SamplerState) {
        self.commands.push(Command::BindTexture(unit, texture, sampler));
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayId) {
        self.commands.push(Command::BindVertexArray(vertex_array));
    }

    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32) {
        self.commands.push(Command::Draw(topology, first, count));
    }

    fn unbind_vertex_array(&mut self) {
        self.commands.push(Command::UnbindVertexArray);
    }

    fn stop_using_program(&mut self) {
        self.commands.push(Command::StopUsingProgram);
    }
}
