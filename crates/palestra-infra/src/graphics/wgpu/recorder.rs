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

use palestra_core::renderer::{
    CommandRecorder, PrimitiveTopology, ProgramId, SamplerState, TextureId, UniformValue,
    VertexArrayId,
};

use super::conversions::primitive_count;
use super::device::{PreparedDraw, WgpuDevice};

/// Texture units a recorder tracks.
pub const MAX_TEXTURE_UNITS: usize = 16;

/// One draw ready for the render pass.
#[derive(Debug)]
pub(crate) struct DrawCall {
    pub(crate) prepared: PreparedDraw,
    /// Byte offset of this draw's uniform snapshot in the frame's uniform ring.
    pub(crate) uniform_offset: u32,
}

/// The commands of one frame, recorded on the CPU.
#[derive(Debug, Default)]
pub struct FrameRecording {
    pub(crate) uniform_bytes: Vec<u8>,
    pub(crate) draws: Vec<DrawCall>,
    /// Primitives assembled by all recorded draws.
    pub primitives: u32,
    /// Triangles among those primitives.
    pub triangles: u32,
}

impl FrameRecording {
    /// Number of draw calls the frame will submit.
    pub fn draw_calls(&self) -> u32 {
        self.draws.len() as u32
    }
}

/// A [`CommandRecorder`] that resolves GL-style state into self-contained
/// draws.
///
/// Every `draw_arrays` captures the current program's uniform block and the
/// textures bound to the units its samplers point at, so later state changes
/// never leak into earlier draws.
#[derive(Debug)]
pub struct WgpuCommandRecorder<'a> {
    device: &'a WgpuDevice,
    uniform_alignment: usize,
    program: Option<ProgramId>,
    vertex_array: Option<VertexArrayId>,
    units: [Option<(TextureId, SamplerState)>; MAX_TEXTURE_UNITS],
    recording: FrameRecording,
}

impl<'a> WgpuCommandRecorder<'a> {
    /// Starts an empty recording. `uniform_alignment` is the device's
    /// `min_uniform_buffer_offset_alignment`.
    pub fn new(device: &'a WgpuDevice, uniform_alignment: u32) -> Self {
        Self {
            device,
            uniform_alignment: uniform_alignment.max(1) as usize,
            program: None,
            vertex_array: None,
            units: [None; MAX_TEXTURE_UNITS],
            recording: FrameRecording::default(),
        }
    }

    /// Ends the recording.
    pub fn finish(self) -> FrameRecording {
        self.recording
    }

    fn push_uniforms(&mut self, data: &[u8]) -> u32 {
        let bytes = &mut self.recording.uniform_bytes;
        let offset = bytes.len().next_multiple_of(self.uniform_alignment);
        bytes.resize(offset, 0);
        bytes.extend_from_slice(data);
        offset as u32
    }
}

impl CommandRecorder for WgpuCommandRecorder<'_> {
    fn use_program(&mut self, program: ProgramId) {
        self.program = Some(program);
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        match self.program {
            Some(program) => self.device.set_uniform(program, name, value),
            None => log::trace!("set_uniform('{name}') with no program in use"),
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId, sampler: SamplerState) {
        match self.units.get_mut(unit as usize) {
            Some(slot) => *slot = Some((texture, sampler)),
            None => log::trace!("Texture unit {unit} is out of range"),
        }
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayId) {
        self.vertex_array = Some(vertex_array);
    }

    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32) {
        let (Some(program), Some(vertex_array)) = (self.program, self.vertex_array) else {
            log::trace!("draw_arrays without a program and a vertex array");
            return;
        };
        if count == 0 {
            return;
        }

        match self
            .device
            .prepare_draw(program, vertex_array, topology, first..first + count, &self.units)
        {
            Ok(prepared) => {
                let uniform_offset = self.push_uniforms(&prepared.uniform_data);
                let primitives = primitive_count(topology, count);
                self.recording.primitives += primitives;
                if matches!(
                    topology,
                    PrimitiveTopology::TriangleList | PrimitiveTopology::TriangleStrip
                ) {
                    self.recording.triangles += primitives;
                }
                self.recording.draws.push(DrawCall {
                    prepared,
                    uniform_offset,
                });
            }
            Err(e) => log::warn!("Skipping draw of {vertex_array:?} with {program:?}: {e}"),
        }
    }

    fn unbind_vertex_array(&mut self) {
        self.vertex_array = None;
    }

    fn stop_using_program(&mut self) {
        self.program = None;
    }
}
