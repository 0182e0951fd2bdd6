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

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU64;
use std::sync::{Arc, Mutex};

use palestra_core::math::Vec4;
use palestra_core::platform::window::{PalestraWindow, PalestraWindowHandle};
use palestra_core::renderer::{
    CommandRecorder, GraphicsDevice, RenderError, RenderStats, RenderSystem,
};

use super::context::WgpuGraphicsContext;
use super::conversions::IntoWgpu;
use super::device::{LayoutKey, WgpuDevice};
use super::recorder::{FrameRecording, WgpuCommandRecorder};

/// Smallest uniform ring the system allocates.
const MIN_UNIFORM_RING_SIZE: u64 = 64 * 1024;

/// The `wgpu` [`RenderSystem`]: one window surface, one render pass per frame.
pub struct WgpuRenderSystem {
    graphics_context_shared: Option<Arc<Mutex<WgpuGraphicsContext>>>,
    wgpu_device: Option<Arc<WgpuDevice>>,
    // Declared after the context: the surface must be dropped before the window.
    window_handle: Option<PalestraWindowHandle>,
    uniform_ring: Option<wgpu::Buffer>,
    uniform_alignment: u32,
    current_width: u32,
    current_height: u32,
    frame_count: u64,
    last_frame_stats: RenderStats,
}

impl fmt::Debug for WgpuRenderSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WgpuRenderSystem")
            .field("initialized", &self.graphics_context_shared.is_some())
            .field("current_width", &self.current_width)
            .field("current_height", &self.current_height)
            .field("frame_count", &self.frame_count)
            .field("last_frame_stats", &self.last_frame_stats)
            .finish()
    }
}

impl Default for WgpuRenderSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl WgpuRenderSystem {
    /// Creates an uninitialized render system; call [`RenderSystem::init`]
    /// once the window exists.
    pub fn new() -> Self {
        log::info!("WgpuRenderSystem created (uninitialized).");
        Self {
            graphics_context_shared: None,
            wgpu_device: None,
            window_handle: None,
            uniform_ring: None,
            uniform_alignment: 256,
            current_width: 0,
            current_height: 0,
            frame_count: 0,
            last_frame_stats: RenderStats::default(),
        }
    }

    fn acquire_frame(
        &self,
        gc_guard: &mut WgpuGraphicsContext,
    ) -> Result<wgpu::SurfaceTexture, RenderError> {
        match gc_guard.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!(
                    "WgpuRenderSystem: Swapchain surface lost or outdated ({e:?}). Reconfiguring with {}x{}",
                    self.current_width,
                    self.current_height
                );
                gc_guard.resize(self.current_width, self.current_height);
                gc_guard.get_current_texture().map_err(|e| {
                    RenderError::SurfaceAcquisitionFailed(format!(
                        "Surface still unavailable after reconfiguring: {e:?}"
                    ))
                })
            }
            Err(e) => Err(RenderError::SurfaceAcquisitionFailed(format!("{e:?}"))),
        }
    }

    /// Copies the frame's uniform snapshots into the ring, growing it first if
    /// needed.
    fn upload_uniforms(&mut self, gc: &WgpuGraphicsContext, bytes: &[u8]) -> Option<&wgpu::Buffer> {
        if bytes.is_empty() {
            return None;
        }
        let needed = bytes.len() as u64;
        if self.uniform_ring.as_ref().is_none_or(|ring| ring.size() < needed) {
            let size = needed.next_power_of_two().max(MIN_UNIFORM_RING_SIZE);
            log::debug!("WgpuRenderSystem: Uniform ring grown to {size} bytes");
            self.uniform_ring = Some(gc.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Palestra Uniform Ring"),
                size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
        let ring = self.uniform_ring.as_ref()?;
        gc.queue.write_buffer(ring, 0, bytes);
        Some(ring)
    }

    fn encode_frame(
        gc: &WgpuGraphicsContext,
        ring: Option<&wgpu::Buffer>,
        target: &wgpu::TextureView,
        clear_color: Vec4,
        recording: &FrameRecording,
    ) -> wgpu::CommandBuffer {
        let mut uniform_groups: HashMap<LayoutKey, wgpu::BindGroup> = HashMap::new();
        if let Some(ring) = ring {
            for draw in &recording.draws {
                let layouts = &draw.prepared.layouts;
                uniform_groups.entry(layouts.key).or_insert_with(|| {
                    gc.device.create_bind_group(&wgpu::BindGroupDescriptor {
                        label: Some("Palestra Uniform Bind Group"),
                        layout: &layouts.uniforms,
                        entries: &[wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                                buffer: ring,
                                offset: 0,
                                size: NonZeroU64::new(layouts.key.0),
                            }),
                        }],
                    })
                });
            }
        }

        let mut encoder = gc
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Palestra Frame Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Palestra Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color.into_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &gc.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for call in &recording.draws {
                let draw = &call.prepared;
                let Some(uniforms) = uniform_groups.get(&draw.layouts.key) else {
                    continue;
                };
                render_pass.set_pipeline(&draw.pipeline);
                render_pass.set_bind_group(0, uniforms, &[call.uniform_offset]);
                if let Some(textures) = &draw.textures {
                    render_pass.set_bind_group(1, textures.as_ref(), &[]);
                }
                for (slot, buffer) in draw.vertex_buffers.iter().enumerate() {
                    render_pass.set_vertex_buffer(slot as u32, buffer.slice(..));
                }
                render_pass.draw(draw.first..draw.first + draw.count, 0..1);
            }
        }
        encoder.finish()
    }
}

impl RenderSystem for WgpuRenderSystem {
    fn init(&mut self, window: &dyn PalestraWindow) -> Result<(), RenderError> {
        if self.graphics_context_shared.is_some() {
            log::warn!("WgpuRenderSystem::init called but it's already initialized.");
            return Ok(());
        }
        log::info!("WgpuRenderSystem: Initializing internal GraphicsContext...");

        let handle = window.clone_handle_arc();
        let initial_size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let context =
            pollster::block_on(WgpuGraphicsContext::new(&instance, &handle, initial_size))
                .map_err(|e| {
                    log::error!("WgpuRenderSystem: Failed to initialize GraphicsContext: {e:#}");
                    RenderError::InitializationFailed(format!("GraphicsContext creation error: {e:#}"))
                })?;

        log::info!(
            "WgpuRenderSystem: Using adapter '{}' ({:?})",
            context.adapter_name,
            context.adapter_backend
        );
        self.uniform_alignment = context.device_limits.min_uniform_buffer_offset_alignment;
        self.current_width = initial_size.0.max(1);
        self.current_height = initial_size.1.max(1);

        let shared = Arc::new(Mutex::new(context));
        self.wgpu_device = Some(Arc::new(WgpuDevice::new(shared.clone())));
        self.graphics_context_shared = Some(shared);
        self.window_handle = Some(handle);
        Ok(())
    }

    fn resize(&mut self, new_width: u32, new_height: u32) {
        self.current_width = new_width;
        self.current_height = new_height;
        if new_width == 0 || new_height == 0 {
            log::debug!("WgpuRenderSystem: Window minimized, rendering paused.");
            return;
        }

        if let Some(gc_arc_mutex) = &self.graphics_context_shared {
            match gc_arc_mutex.lock() {
                Ok(mut gc_guard) => gc_guard.resize(new_width, new_height),
                Err(e) => log::error!("WgpuRenderSystem::resize: Failed to lock GraphicsContext: {e}"),
            }
        } else {
            log::warn!("WgpuRenderSystem::resize called but GraphicsContext is None.");
        }
    }

    fn render(
        &mut self,
        clear_color: Vec4,
        record: &mut dyn FnMut(&mut dyn CommandRecorder),
    ) -> Result<RenderStats, RenderError> {
        let device = self.wgpu_device.clone().ok_or(RenderError::NotInitialized)?;
        let gc = self
            .graphics_context_shared
            .clone()
            .ok_or(RenderError::NotInitialized)?;
        if self.current_width == 0 || self.current_height == 0 {
            return Ok(self.last_frame_stats.clone());
        }

        // --- 1. Record (the device locks the context on its own) ---
        let mut recorder = WgpuCommandRecorder::new(&device, self.uniform_alignment);
        record(&mut recorder);
        let recording = recorder.finish();

        // --- 2. Acquire, encode, submit ---
        let mut gc_guard = gc.lock().map_err(|e| {
            RenderError::SurfaceAcquisitionFailed(format!("Failed to lock GraphicsContext: {e}"))
        })?;
        let output = self.acquire_frame(&mut gc_guard)?;
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let ring = self.upload_uniforms(&gc_guard, &recording.uniform_bytes);
        let commands = Self::encode_frame(&gc_guard, ring, &target, clear_color, &recording);
        gc_guard.queue.submit(std::iter::once(commands));
        drop(gc_guard);
        output.present();

        self.frame_count += 1;
        self.last_frame_stats = RenderStats {
            frame_number: self.frame_count,
            draw_calls: recording.draw_calls(),
            triangles_rendered: recording.triangles,
        };
        log::trace!("WgpuRenderSystem: {:?}", self.last_frame_stats);
        Ok(self.last_frame_stats.clone())
    }

    fn graphics_device(&self) -> Result<Arc<dyn GraphicsDevice>, RenderError> {
        self.wgpu_device
            .clone()
            .map(|device| device as Arc<dyn GraphicsDevice>)
            .ok_or(RenderError::NotInitialized)
    }

    fn shutdown(&mut self) {
        log::info!("WgpuRenderSystem shutting down...");
        self.uniform_ring = None;
        if let Some(device_arc) = self.wgpu_device.take() {
            log::debug!(
                "WgpuDevice Arc count before drop: {}",
                Arc::strong_count(&device_arc)
            );
        }
        if let Some(gc_arc_mutex) = self.graphics_context_shared.take() {
            if Arc::try_unwrap(gc_arc_mutex).is_err() {
                log::warn!(
                    "WgpuGraphicsContext is still shared during shutdown. It will be dropped with its last reference."
                );
            }
        }
        self.window_handle = None;
        log::info!("WgpuRenderSystem shutdown complete.");
    }
}
