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

use std::sync::Arc;

use super::{CommandRecorder, GraphicsDevice};
use crate::math::Vec4;
use crate::platform::window::PalestraWindow;
use crate::renderer::error::RenderError;

/// Counters gathered while rendering one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of frames rendered so far, including this one.
    pub frame_number: u64,
    /// Draw calls that actually reached the GPU.
    pub draw_calls: u32,
    /// Triangles submitted by those draw calls.
    pub triangles_rendered: u32,
}

/// Owns the surface and turns recorded commands into presented frames.
pub trait RenderSystem: std::fmt::Debug {
    /// Creates the surface, device and queue for `window`.
    fn init(&mut self, window: &dyn PalestraWindow) -> Result<(), RenderError>;

    /// Reconfigures the surface and depth buffer.
    fn resize(&mut self, new_width: u32, new_height: u32);

    /// Clears the frame to `clear_color`, lets `record` issue commands, then
    /// submits and presents.
    fn render(
        &mut self,
        clear_color: Vec4,
        record: &mut dyn FnMut(&mut dyn CommandRecorder),
    ) -> Result<RenderStats, RenderError>;

    /// The device used to create resources for this system.
    fn graphics_device(&self) -> Result<Arc<dyn GraphicsDevice>, RenderError>;

    /// Releases GPU resources.
    fn shutdown(&mut self);
}
