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

//! The `wgpu` implementation of [`GraphicsDevice`].
//!
//! A program here is a GL-style program object: besides its pipeline it owns
//! a CPU copy of its uniform block, so values set while drawing one mesh stay
//! in place until they are overwritten. Every draw snapshots that block into
//! the frame's uniform ring (see [`WgpuCommandRecorder`](super::WgpuCommandRecorder)).

use std::borrow::Cow;
use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use palestra_core::renderer::{
    BufferId, CubeMapDescriptor, FilterMode, GraphicsDevice, PrimitiveTopology, ProgramDescriptor,
    ProgramId, ResourceError, SamplerState, ShaderError, ShaderInterface, Texture2dDescriptor,
    TextureError, TextureId, UniformType, UniformValue, VertexArrayId, VertexAttribute, WrapMode,
};
use wgpu::util::DeviceExt;

use super::context::{WgpuGraphicsContext, DEPTH_FORMAT};
use super::conversions::{vertex_format, IntoWgpu, SamplerKey};

/// Uniform block size and sampler count: everything the bind group layouts
/// depend on.
pub(crate) type LayoutKey = (u64, u32);

/// Bind group layouts shared by every program with the same [`LayoutKey`].
///
/// Group 0 is the uniform block (one dynamic offset per draw). Group 1, when
/// the program samples textures, holds a texture at binding `2i` and its
/// sampler at `2i + 1` for every element `i` of the sampler array.
#[derive(Debug)]
pub(crate) struct ProgramLayouts {
    pub(crate) key: LayoutKey,
    pub(crate) uniforms: wgpu::BindGroupLayout,
    pub(crate) textures: Option<wgpu::BindGroupLayout>,
    pipeline_layout: wgpu::PipelineLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    vertex_module: usize,
    fragment_module: usize,
    vertex_entry_point: String,
    fragment_entry_point: String,
    layout: LayoutKey,
    vertex_layout: Vec<(u32, Vec<(u32, u32, u32)>)>,
    topology: PrimitiveTopology,
}

#[derive(Debug)]
struct ProgramEntry {
    label: String,
    interface: Arc<ShaderInterface>,
    layouts: Arc<ProgramLayouts>,
    pipeline_key: PipelineKey,
    uniform_data: Vec<u8>,
    /// Texture unit each element of the sampler array reads from.
    sampler_units: Vec<u32>,
}

#[derive(Debug)]
struct BufferEntry {
    buffer: Arc<wgpu::Buffer>,
}

#[derive(Debug)]
struct VertexArrayEntry {
    program: ProgramId,
    bindings: Vec<(BufferId, VertexAttribute)>,
}

#[derive(Debug)]
struct TextureEntry {
    _texture: wgpu::Texture,
    view: Arc<wgpu::TextureView>,
    wrap: WrapMode,
    is_cube: bool,
}

#[derive(Debug, Default)]
struct ShaderModules {
    by_source: HashMap<String, usize>,
    modules: Vec<Arc<wgpu::ShaderModule>>,
}

type TextureBindingKey = (LayoutKey, Vec<Option<(TextureId, SamplerKey)>>);

/// Everything the render pass needs to replay one draw.
#[derive(Debug)]
pub(crate) struct PreparedDraw {
    pub(crate) pipeline: Arc<wgpu::RenderPipeline>,
    pub(crate) layouts: Arc<ProgramLayouts>,
    pub(crate) uniform_data: Vec<u8>,
    pub(crate) textures: Option<Arc<wgpu::BindGroup>>,
    pub(crate) vertex_buffers: Vec<Arc<wgpu::Buffer>>,
    pub(crate) first: u32,
    pub(crate) count: u32,
}

/// The internal, non-clonable state of the [`WgpuDevice`].
#[derive(Debug)]
struct WgpuDeviceInternal {
    context: Arc<Mutex<WgpuGraphicsContext>>,
    modules: Mutex<ShaderModules>,
    layouts: Mutex<HashMap<LayoutKey, Arc<ProgramLayouts>>>,
    pipelines: Mutex<HashMap<PipelineKey, Arc<wgpu::RenderPipeline>>>,
    programs: Mutex<HashMap<ProgramId, ProgramEntry>>,
    buffers: Mutex<HashMap<BufferId, BufferEntry>>,
    vertex_arrays: Mutex<HashMap<VertexArrayId, VertexArrayEntry>>,
    textures: Mutex<HashMap<TextureId, TextureEntry>>,
    samplers: Mutex<HashMap<SamplerKey, Arc<wgpu::Sampler>>>,
    texture_bind_groups: Mutex<HashMap<TextureBindingKey, Arc<wgpu::BindGroup>>>,
    /// Bound to sampler slots whose unit holds no 2D texture.
    white_texture: Mutex<Option<Arc<wgpu::TextureView>>>,
    /// Feeds vertex-buffer slots a vertex array leaves unbound.
    zero_buffer: Mutex<Option<Arc<wgpu::Buffer>>>,

    next_program_id: AtomicUsize,
    next_buffer_id: AtomicUsize,
    next_vertex_array_id: AtomicUsize,
    next_texture_id: AtomicUsize,
}

/// A clonable, thread-safe handle to the WGPU graphics device.
#[derive(Clone, Debug)]
pub struct WgpuDevice {
    internal: Arc<WgpuDeviceInternal>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, ResourceError> {
    mutex
        .lock()
        .map_err(|e| ResourceError::BackendError(format!("Mutex poisoned ({what}): {e}")))
}

impl WgpuDevice {
    /// Wraps a graphics context.
    pub fn new(context: Arc<Mutex<WgpuGraphicsContext>>) -> Self {
        Self {
            internal: Arc::new(WgpuDeviceInternal {
                context,
                modules: Mutex::new(ShaderModules::default()),
                layouts: Mutex::new(HashMap::new()),
                pipelines: Mutex::new(HashMap::new()),
                programs: Mutex::new(HashMap::new()),
                buffers: Mutex::new(HashMap::new()),
                vertex_arrays: Mutex::new(HashMap::new()),
                textures: Mutex::new(HashMap::new()),
                samplers: Mutex::new(HashMap::new()),
                texture_bind_groups: Mutex::new(HashMap::new()),
                white_texture: Mutex::new(None),
                zero_buffer: Mutex::new(None),
                next_program_id: AtomicUsize::new(0),
                next_buffer_id: AtomicUsize::new(0),
                next_vertex_array_id: AtomicUsize::new(0),
                next_texture_id: AtomicUsize::new(0),
            }),
        }
    }

    /// Helper function to execute an operation with the graphics context locked.
    fn with_context<F, R>(&self, operation: F) -> Result<R, ResourceError>
    where
        F: FnOnce(&WgpuGraphicsContext) -> Result<R, ResourceError>,
    {
        let context_guard = lock(&self.internal.context, "context")?;
        operation(&context_guard)
    }

    // --- Shader programs ---

    fn shader_module(
        &self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        entry_point: &str,
    ) -> Result<usize, ResourceError> {
        if let Some(&index) = lock(&self.internal.modules, "modules")?.by_source.get(source) {
            return Ok(index);
        }
        if !source.contains(&format!("fn {entry_point}")) {
            return Err(ShaderError::InvalidEntryPoint {
                label: label.to_string(),
                entry_point: entry_point.to_string(),
            }
            .into());
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
        });
        if let Some(e) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::CompilationError {
                label: label.to_string(),
                details: e.to_string(),
            }
            .into());
        }

        let mut modules = lock(&self.internal.modules, "modules")?;
        modules.modules.push(Arc::new(module));
        let index = modules.modules.len() - 1;
        modules.by_source.insert(source.to_string(), index);
        log::debug!("WgpuDevice: Compiled shader module '{label}' ({index})");
        Ok(index)
    }

    fn program_layouts(
        &self,
        device: &wgpu::Device,
        interface: &ShaderInterface,
    ) -> Result<Arc<ProgramLayouts>, ResourceError> {
        let sampler_count = interface.samplers.as_ref().map_or(0, |s| s.count);
        let key: LayoutKey = (interface.uniforms.size() as u64, sampler_count);
        let mut layouts = lock(&self.internal.layouts, "layouts")?;
        if let Some(existing) = layouts.get(&key) {
            return Ok(existing.clone());
        }

        let uniforms = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Palestra Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(key.0),
                },
                count: None,
            }],
        });

        let textures = (sampler_count > 0).then(|| {
            let entries: Vec<wgpu::BindGroupLayoutEntry> = (0..sampler_count)
                .flat_map(|i| {
                    [
                        wgpu::BindGroupLayoutEntry {
                            binding: 2 * i,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2 * i + 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ]
                })
                .collect();
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Palestra Texture Layout"),
                entries: &entries,
            })
        });

        let mut groups = vec![&uniforms];
        groups.extend(textures.as_ref());
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Palestra Pipeline Layout"),
            bind_group_layouts: &groups,
            push_constant_ranges: &[],
        });

        let created = Arc::new(ProgramLayouts {
            key,
            uniforms,
            textures,
            pipeline_layout,
        });
        layouts.insert(key, created.clone());
        Ok(created)
    }

    /// Returns the cached pipeline for `key`, creating it on first use.
    fn pipeline(
        &self,
        key: &PipelineKey,
        interface: &ShaderInterface,
        layouts: &ProgramLayouts,
        label: &str,
    ) -> Result<Arc<wgpu::RenderPipeline>, ResourceError> {
        if let Some(pipeline) = lock(&self.internal.pipelines, "pipelines")?.get(key) {
            return Ok(pipeline.clone());
        }

        let (vertex_module, fragment_module) = {
            let modules = lock(&self.internal.modules, "modules")?;
            let get = |index: usize| {
                modules.modules.get(index).cloned().ok_or_else(|| {
                    ResourceError::InvalidHandle(format!("shader module {index}"))
                })
            };
            (get(key.vertex_module)?, get(key.fragment_module)?)
        };

        let attributes: Vec<Vec<wgpu::VertexAttribute>> = interface
            .vertex_buffers
            .iter()
            .map(|buffer| {
                buffer
                    .attributes
                    .iter()
                    .filter_map(|(attr, offset)| {
                        Some(wgpu::VertexAttribute {
                            format: vertex_format(attr.components)?,
                            offset: *offset as u64 * 4,
                            shader_location: attr.location,
                        })
                    })
                    .collect()
            })
            .collect();
        let buffers: Vec<wgpu::VertexBufferLayout> = interface
            .vertex_buffers
            .iter()
            .zip(&attributes)
            .map(|(buffer, attrs)| wgpu::VertexBufferLayout {
                array_stride: buffer.stride as u64 * 4,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let pipeline = self.with_context(|ctx| {
            let device = &ctx.device;
            device.push_error_scope(wgpu::ErrorFilter::Validation);
            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layouts.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vertex_module,
                    entry_point: Some(&key.vertex_entry_point),
                    buffers: &buffers,
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fragment_module,
                    entry_point: Some(&key.fragment_entry_point),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format(),
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: key.topology.into_wgpu(),
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });
            match pollster::block_on(device.pop_error_scope()) {
                None => Ok(Arc::new(pipeline)),
                Some(e) => Err(ShaderError::CompilationError {
                    label: label.to_string(),
                    details: e.to_string(),
                }
                .into()),
            }
        })?;

        log::debug!(
            "WgpuDevice: Created {:?} pipeline for '{label}'",
            key.topology
        );
        lock(&self.internal.pipelines, "pipelines")?.insert(key.clone(), pipeline.clone());
        Ok(pipeline)
    }

    /// Writes `value` into the uniform state of `program`.
    ///
    /// `name[i]` on the sampler array selects the texture unit sampler `i`
    /// reads from. Unknown names and type mismatches change nothing.
    pub(crate) fn set_uniform(&self, program: ProgramId, name: &str, value: UniformValue) {
        let Ok(mut programs) = self.internal.programs.lock() else {
            return;
        };
        let Some(entry) = programs.get_mut(&program) else {
            log::trace!("set_uniform('{name}') on unknown program {program:?}");
            return;
        };

        if let Some(index) = entry.interface.sampler_index(name) {
            match value {
                UniformValue::Int(unit) if unit >= 0 => {
                    entry.sampler_units[index as usize] = unit as u32;
                }
                other => log::trace!("Sampler '{name}' expects a texture unit, got {other:?}"),
            }
            return;
        }

        match entry.interface.uniforms.slot(name) {
            Some(slot) if slot.ty == value.uniform_type() => {
                value.write_bytes(&mut entry.uniform_data[slot.offset..]);
            }
            Some(slot) => log::trace!(
                "Uniform '{name}' of '{}' is {:?}, got {:?}",
                entry.label,
                slot.ty,
                value.uniform_type()
            ),
            None => log::trace!("Program '{}' has no uniform '{name}'", entry.label),
        }
    }

    // --- Draw preparation ---

    /// Resolves everything a draw needs and snapshots the program's uniforms.
    ///
    /// `units` is the texture-unit table of the recorder at the time of the
    /// draw.
    pub(crate) fn prepare_draw(
        &self,
        program: ProgramId,
        vertex_array: VertexArrayId,
        topology: PrimitiveTopology,
        vertices: std::ops::Range<u32>,
        units: &[Option<(TextureId, SamplerState)>],
    ) -> Result<PreparedDraw, ResourceError> {
        let (label, interface, layouts, pipeline_key, mut uniform_data, sampler_units) = {
            let programs = lock(&self.internal.programs, "programs")?;
            let entry = programs
                .get(&program)
                .ok_or_else(|| ResourceError::InvalidHandle(format!("{program:?}")))?;
            let key = PipelineKey {
                topology,
                ..entry.pipeline_key.clone()
            };
            (
                entry.label.clone(),
                entry.interface.clone(),
                entry.layouts.clone(),
                key,
                entry.uniform_data.clone(),
                entry.sampler_units.clone(),
            )
        };
        let pipeline = self.pipeline(&pipeline_key, &interface, &layouts, &label)?;

        let bound = |slot: usize| -> Option<(TextureId, SamplerState)> {
            let unit = *sampler_units.get(slot)? as usize;
            units.get(unit).copied().flatten()
        };

        if let Some(slot) = interface
            .lod_bias_uniform
            .as_deref()
            .and_then(|name| interface.uniforms.slot(name))
            .filter(|slot| slot.ty == UniformType::Float)
        {
            let bias = bound(0).map_or(0.0, |(_, state)| state.lod_bias);
            UniformValue::Float(bias).write_bytes(&mut uniform_data[slot.offset..]);
        }

        let textures = match &layouts.textures {
            Some(layout) => {
                let slots: Vec<_> = (0..sampler_units.len()).map(bound).collect();
                Some(self.texture_bind_group(layouts.key, layout, &slots)?)
            }
            None => None,
        };

        let vertex_buffers =
            self.vertex_buffers(vertex_array, &interface, vertices.end as u64)?;

        Ok(PreparedDraw {
            pipeline,
            layouts,
            uniform_data,
            textures,
            vertex_buffers,
            first: vertices.start,
            count: vertices.end - vertices.start,
        })
    }

    fn vertex_buffers(
        &self,
        vertex_array: VertexArrayId,
        interface: &ShaderInterface,
        vertex_end: u64,
    ) -> Result<Vec<Arc<wgpu::Buffer>>, ResourceError> {
        let bindings = {
            let arrays = lock(&self.internal.vertex_arrays, "vertex arrays")?;
            arrays
                .get(&vertex_array)
                .ok_or_else(|| ResourceError::InvalidHandle(format!("{vertex_array:?}")))?
                .bindings
                .clone()
        };

        let mut out = Vec::with_capacity(interface.vertex_buffers.len());
        for (slot, decl) in interface.vertex_buffers.iter().enumerate() {
            let bound = bindings.iter().find(|(_, attr)| {
                interface.slot_of_location(attr.location) == Some(slot)
            });
            match bound {
                Some((buffer_id, _)) => {
                    let buffers = lock(&self.internal.buffers, "buffers")?;
                    let entry = buffers
                        .get(buffer_id)
                        .ok_or_else(|| ResourceError::InvalidHandle(format!("{buffer_id:?}")))?;
                    out.push(entry.buffer.clone());
                }
                None => out.push(self.zero_buffer(vertex_end * decl.stride as u64 * 4)?),
            }
        }
        Ok(out)
    }

    /// A zero-filled vertex buffer of at least `min_size` bytes.
    fn zero_buffer(&self, min_size: u64) -> Result<Arc<wgpu::Buffer>, ResourceError> {
        let mut cached = lock(&self.internal.zero_buffer, "zero buffer")?;
        if let Some(buffer) = cached.as_ref().filter(|b| b.size() >= min_size) {
            return Ok(buffer.clone());
        }
        let size = min_size.max(4).next_power_of_two();
        let buffer = self.with_context(|ctx| {
            Ok(Arc::new(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Palestra Zero Vertex Buffer"),
                size,
                usage: wgpu::BufferUsages::VERTEX,
                mapped_at_creation: false,
            })))
        })?;
        log::debug!("WgpuDevice: Zero vertex buffer grown to {size} bytes");
        *cached = Some(buffer.clone());
        Ok(buffer)
    }

    fn texture_bind_group(
        &self,
        layout_key: LayoutKey,
        layout: &wgpu::BindGroupLayout,
        slots: &[Option<(TextureId, SamplerState)>],
    ) -> Result<Arc<wgpu::BindGroup>, ResourceError> {
        let mut resolved = Vec::with_capacity(slots.len());
        {
            let textures = lock(&self.internal.textures, "textures")?;
            for slot in slots {
                let entry = slot.and_then(|(id, state)| {
                    let texture = textures.get(&id)?;
                    if texture.is_cube {
                        log::trace!("Cube map {id:?} bound to a 2D sampler, using white");
                        return None;
                    }
                    let key = SamplerKey {
                        mag_filter: state.mag_filter,
                        min_filter: state.min_filter,
                        wrap: texture.wrap,
                    };
                    Some((id, key, texture.view.clone()))
                });
                resolved.push(entry);
            }
        }

        let cache_key: TextureBindingKey = (
            layout_key,
            resolved
                .iter()
                .map(|r| r.as_ref().map(|(id, key, _)| (*id, *key)))
                .collect(),
        );
        if let Some(group) = lock(&self.internal.texture_bind_groups, "bind groups")?.get(&cache_key) {
            return Ok(group.clone());
        }

        let fallback_sampler = SamplerKey {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            wrap: WrapMode::ClampToEdge,
        };
        let mut views_and_samplers = Vec::with_capacity(resolved.len());
        for entry in resolved {
            let pair = match entry {
                Some((_, key, view)) => (view, self.sampler(key)?),
                None => (self.white_texture()?, self.sampler(fallback_sampler)?),
            };
            views_and_samplers.push(pair);
        }

        let group = self.with_context(|ctx| {
            let entries: Vec<wgpu::BindGroupEntry> = views_and_samplers
                .iter()
                .enumerate()
                .flat_map(|(i, (view, sampler))| {
                    [
                        wgpu::BindGroupEntry {
                            binding: 2 * i as u32,
                            resource: wgpu::BindingResource::TextureView(view.as_ref()),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2 * i as u32 + 1,
                            resource: wgpu::BindingResource::Sampler(sampler.as_ref()),
                        },
                    ]
                })
                .collect();
            Ok(Arc::new(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Palestra Texture Bind Group"),
                layout,
                entries: &entries,
            })))
        })?;
        lock(&self.internal.texture_bind_groups, "bind groups")?.insert(cache_key, group.clone());
        Ok(group)
    }

    fn sampler(&self, key: SamplerKey) -> Result<Arc<wgpu::Sampler>, ResourceError> {
        let mut samplers = lock(&self.internal.samplers, "samplers")?;
        if let Some(sampler) = samplers.get(&key) {
            return Ok(sampler.clone());
        }
        let sampler =
            self.with_context(|ctx| Ok(Arc::new(ctx.device.create_sampler(&key.descriptor()))))?;
        log::debug!("WgpuDevice: Created sampler {key:?}");
        samplers.insert(key, sampler.clone());
        Ok(sampler)
    }

    fn white_texture(&self) -> Result<Arc<wgpu::TextureView>, ResourceError> {
        let mut cached = lock(&self.internal.white_texture, "white texture")?;
        if let Some(view) = cached.as_ref() {
            return Ok(view.clone());
        }
        let view = self.with_context(|ctx| {
            let texture = ctx.device.create_texture_with_data(
                &ctx.queue,
                &wgpu::TextureDescriptor {
                    label: Some("Palestra White Texture"),
                    size: wgpu::Extent3d {
                        width: 1,
                        height: 1,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: wgpu::TextureFormat::Rgba8Unorm,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                },
                wgpu::util::TextureDataOrder::LayerMajor,
                &[255; 4],
            );
            Ok(Arc::new(
                texture.create_view(&wgpu::TextureViewDescriptor::default()),
            ))
        })?;
        *cached = Some(view.clone());
        Ok(view)
    }
}

impl GraphicsDevice for WgpuDevice {
    fn create_program(&self, descriptor: &ProgramDescriptor<'_>) -> Result<ProgramId, ResourceError> {
        let interface = descriptor.interface;
        if let Some((attr, _)) = interface
            .vertex_buffers
            .iter()
            .flat_map(|b| b.attributes.iter())
            .find(|(attr, _)| vertex_format(attr.components).is_none())
        {
            return Err(ResourceError::BackendError(format!(
                "Attribute '{}' has {} components",
                attr.name, attr.components
            )));
        }

        let (vertex_module, fragment_module, layouts) = self.with_context(|ctx| {
            let vs = self.shader_module(
                &ctx.device,
                descriptor.label,
                descriptor.vertex_source,
                descriptor.vertex_entry_point,
            )?;
            let fs = self.shader_module(
                &ctx.device,
                descriptor.label,
                descriptor.fragment_source,
                descriptor.fragment_entry_point,
            )?;
            Ok((vs, fs, self.program_layouts(&ctx.device, interface)?))
        })?;

        let pipeline_key = PipelineKey {
            vertex_module,
            fragment_module,
            vertex_entry_point: descriptor.vertex_entry_point.to_string(),
            fragment_entry_point: descriptor.fragment_entry_point.to_string(),
            layout: layouts.key,
            vertex_layout: interface
                .vertex_buffers
                .iter()
                .map(|b| {
                    let attrs = b
                        .attributes
                        .iter()
                        .map(|(a, offset)| (a.location, a.components, *offset))
                        .collect();
                    (b.stride, attrs)
                })
                .collect(),
            topology: PrimitiveTopology::TriangleList,
        };
        // Surfaces compilation and interface mismatches now rather than at the first draw.
        self.pipeline(&pipeline_key, interface, &layouts, descriptor.label)?;

        let id = ProgramId(self.internal.next_program_id.fetch_add(1, Ordering::Relaxed));
        let sampler_count = interface.samplers.as_ref().map_or(0, |s| s.count) as usize;
        lock(&self.internal.programs, "programs")?.insert(
            id,
            ProgramEntry {
                label: descriptor.label.to_string(),
                interface: Arc::new(interface.clone()),
                uniform_data: vec![0; interface.uniforms.size()],
                sampler_units: vec![0; sampler_count],
                layouts,
                pipeline_key,
            },
        );
        log::debug!(
            "WgpuDevice: Created program '{}' with ID: {id:?}",
            descriptor.label
        );
        Ok(id)
    }

    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        let programs = self.internal.programs.lock().ok()?;
        programs.get(&program)?.interface.attribute(name).map(|a| a.location)
    }

    fn create_vertex_buffer(&self, label: &str, data: &[f32]) -> Result<BufferId, ResourceError> {
        let buffer = self.with_context(|ctx| {
            Ok(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX,
            }))
        })?;
        let id = BufferId(self.internal.next_buffer_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.internal.buffers, "buffers")?.insert(
            id,
            BufferEntry {
                buffer: Arc::new(buffer),
            },
        );
        log::debug!(
            "WgpuDevice: Created buffer '{label}' with ID: {id:?}, size: {} bytes",
            data.len() * 4
        );
        Ok(id)
    }

    fn create_vertex_array(&self, program: ProgramId) -> Result<VertexArrayId, ResourceError> {
        if !lock(&self.internal.programs, "programs")?.contains_key(&program) {
            return Err(ResourceError::InvalidHandle(format!("{program:?}")));
        }
        let id = VertexArrayId(
            self.internal
                .next_vertex_array_id
                .fetch_add(1, Ordering::Relaxed),
        );
        lock(&self.internal.vertex_arrays, "vertex arrays")?.insert(
            id,
            VertexArrayEntry {
                program,
                bindings: Vec::new(),
            },
        );
        Ok(id)
    }

    fn bind_vertex_attribute(
        &self,
        vertex_array: VertexArrayId,
        buffer: BufferId,
        attribute: VertexAttribute,
    ) -> Result<(), ResourceError> {
        if !lock(&self.internal.buffers, "buffers")?.contains_key(&buffer) {
            return Err(ResourceError::InvalidHandle(format!("{buffer:?}")));
        }
        let mut arrays = lock(&self.internal.vertex_arrays, "vertex arrays")?;
        let entry = arrays
            .get_mut(&vertex_array)
            .ok_or_else(|| ResourceError::InvalidHandle(format!("{vertex_array:?}")))?;

        {
            let programs = lock(&self.internal.programs, "programs")?;
            let interface = &programs
                .get(&entry.program)
                .ok_or_else(|| ResourceError::InvalidHandle(format!("{:?}", entry.program)))?
                .interface;
            let declared = interface
                .vertex_buffers
                .iter()
                .find_map(|b| {
                    b.attributes
                        .iter()
                        .find(|(a, _)| a.location == attribute.location)
                        .map(|(a, offset)| (b.stride, a.components, *offset))
                })
                .ok_or_else(|| {
                    ResourceError::UnknownAttribute(format!("location {}", attribute.location))
                })?;
            if declared != (attribute.stride, attribute.components, attribute.offset) {
                return Err(ResourceError::BackendError(format!(
                    "Attribute at location {} is declared as (stride, components, offset) = {declared:?}, bound as {:?}",
                    attribute.location,
                    (attribute.stride, attribute.components, attribute.offset)
                )));
            }
        }

        entry
            .bindings
            .retain(|(_, a)| a.location != attribute.location);
        entry.bindings.push((buffer, attribute));
        Ok(())
    }

    fn create_texture_2d(&self, descriptor: &Texture2dDescriptor<'_>) -> Result<TextureId, ResourceError> {
        let base = descriptor
            .levels
            .first()
            .ok_or(TextureError::InvalidDimensions {
                width: 0,
                height: 0,
            })?;
        for level in descriptor.levels {
            let expected = level.width as usize * level.height as usize * descriptor.format.channels();
            if level.pixels.len() != expected {
                return Err(TextureError::DataSizeMismatch {
                    format: descriptor.format,
                    expected,
                    actual: level.pixels.len(),
                }
                .into());
            }
        }

        let texture = self.with_context(|ctx| {
            let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
                label: descriptor.label,
                size: wgpu::Extent3d {
                    width: base.width,
                    height: base.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: descriptor.levels.len() as u32,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            for (mip_level, level) in descriptor.levels.iter().enumerate() {
                ctx.queue.write_texture(
                    wgpu::TexelCopyTextureInfo {
                        texture: &texture,
                        mip_level: mip_level as u32,
                        origin: wgpu::Origin3d::ZERO,
                        aspect: wgpu::TextureAspect::All,
                    },
                    &descriptor.format.expand_to_rgba8(&level.pixels),
                    wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(4 * level.width),
                        rows_per_image: Some(level.height),
                    },
                    wgpu::Extent3d {
                        width: level.width,
                        height: level.height,
                        depth_or_array_layers: 1,
                    },
                );
            }
            Ok(texture)
        })?;

        let view = Arc::new(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        let id = TextureId(self.internal.next_texture_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.internal.textures, "textures")?.insert(
            id,
            TextureEntry {
                _texture: texture,
                view,
                wrap: descriptor.wrap,
                is_cube: false,
            },
        );
        log::debug!(
            "WgpuDevice: Created texture '{}' with ID: {id:?} ({}x{}, {} levels, {:?} default filter)",
            descriptor.label.unwrap_or_default(),
            base.width,
            base.height,
            descriptor.levels.len(),
            descriptor.filter
        );
        Ok(id)
    }

    fn create_cube_map(&self, descriptor: &CubeMapDescriptor<'_>) -> Result<TextureId, ResourceError> {
        if descriptor.size == 0 {
            return Err(TextureError::InvalidDimensions {
                width: 0,
                height: 0,
            }
            .into());
        }
        let texture = self.with_context(|ctx| {
            Ok(ctx.device.create_texture(&wgpu::TextureDescriptor {
                label: descriptor.label,
                size: wgpu::Extent3d {
                    width: descriptor.size,
                    height: descriptor.size,
                    depth_or_array_layers: 6,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            }))
        })?;
        let view = Arc::new(texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        }));
        let id = TextureId(self.internal.next_texture_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.internal.textures, "textures")?.insert(
            id,
            TextureEntry {
                _texture: texture,
                view,
                wrap: descriptor.wrap,
                is_cube: true,
            },
        );
        log::debug!(
            "WgpuDevice: Created {0}x{0} cube map with ID: {id:?}",
            descriptor.size
        );
        Ok(id)
    }
}
