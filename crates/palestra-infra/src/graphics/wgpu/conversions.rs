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

//! Conversions from Palestra's renderer types to their `wgpu` counterparts.

use palestra_core::math::Vec4;
use palestra_core::renderer::{FilterMode, PrimitiveTopology, WrapMode};

/// A local extension trait to convert Palestra types into WGPU types.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_wgpu()` syntax.
pub trait IntoWgpu<T> {
    /// Consumes self and converts it into a WGPU-compatible type.
    fn into_wgpu(self) -> T;
}

impl IntoWgpu<wgpu::Color> for Vec4 {
    fn into_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.x as f64,
            g: self.y as f64,
            b: self.z as f64,
            a: self.w as f64,
        }
    }
}

/// Mipmap variants collapse to their texel filter; the mip part is handled by
/// [`SamplerKey`].
impl IntoWgpu<wgpu::FilterMode> for FilterMode {
    fn into_wgpu(self) -> wgpu::FilterMode {
        match self.base() {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            _ => wgpu::FilterMode::Linear,
        }
    }
}

impl IntoWgpu<wgpu::AddressMode> for WrapMode {
    fn into_wgpu(self) -> wgpu::AddressMode {
        match self {
            WrapMode::Repeat => wgpu::AddressMode::Repeat,
            WrapMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
            WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        }
    }
}

impl IntoWgpu<wgpu::PrimitiveTopology> for PrimitiveTopology {
    fn into_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveTopology::PointList => wgpu::PrimitiveTopology::PointList,
            PrimitiveTopology::LineList => wgpu::PrimitiveTopology::LineList,
            PrimitiveTopology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            PrimitiveTopology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
            PrimitiveTopology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }
}

/// The float vertex format with `components` lanes.
pub fn vertex_format(components: u32) -> Option<wgpu::VertexFormat> {
    match components {
        1 => Some(wgpu::VertexFormat::Float32),
        2 => Some(wgpu::VertexFormat::Float32x2),
        3 => Some(wgpu::VertexFormat::Float32x3),
        4 => Some(wgpu::VertexFormat::Float32x4),
        _ => None,
    }
}

/// Number of primitives `count` vertices assemble into.
pub fn primitive_count(topology: PrimitiveTopology, count: u32) -> u32 {
    match topology {
        PrimitiveTopology::PointList => count,
        PrimitiveTopology::LineList => count / 2,
        PrimitiveTopology::LineStrip => count.saturating_sub(1),
        PrimitiveTopology::TriangleList => count / 3,
        PrimitiveTopology::TriangleStrip => count.saturating_sub(2),
    }
}

/// Everything that distinguishes one `wgpu::Sampler` from another.
///
/// LOD bias is not part of it: wgpu samplers have no bias, so the scene
/// shader applies it through `textureSampleBias`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerKey {
    /// Magnification filter.
    pub mag_filter: FilterMode,
    /// Minification filter, possibly with a mip component.
    pub min_filter: FilterMode,
    /// Address mode on every axis.
    pub wrap: WrapMode,
}

impl SamplerKey {
    /// Builds the sampler descriptor.
    ///
    /// A minification filter without a mip component samples level 0 only.
    pub fn descriptor(self) -> wgpu::SamplerDescriptor<'static> {
        let address_mode: wgpu::AddressMode = self.wrap.into_wgpu();
        let mip = self.min_filter.mipmap();
        wgpu::SamplerDescriptor {
            label: Some("Palestra Sampler"),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: self.mag_filter.into_wgpu(),
            min_filter: self.min_filter.into_wgpu(),
            mipmap_filter: mip.map_or(wgpu::FilterMode::Nearest, |f| f.into_wgpu()),
            lod_min_clamp: 0.0,
            lod_max_clamp: if mip.is_some() { 32.0 } else { 0.0 },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_mode_drops_mip_component() {
        let f: wgpu::FilterMode = FilterMode::LinearMipmapNearest.into_wgpu();
        assert_eq!(f, wgpu::FilterMode::Linear);
        let f: wgpu::FilterMode = FilterMode::NearestMipmapLinear.into_wgpu();
        assert_eq!(f, wgpu::FilterMode::Nearest);
    }

    #[test]
    fn test_wrap_mode_conversion() {
        let a: wgpu::AddressMode = WrapMode::MirroredRepeat.into_wgpu();
        assert_eq!(a, wgpu::AddressMode::MirrorRepeat);
        let a: wgpu::AddressMode = WrapMode::ClampToEdge.into_wgpu();
        assert_eq!(a, wgpu::AddressMode::ClampToEdge);
    }

    #[test]
    fn test_vertex_format() {
        assert_eq!(vertex_format(2), Some(wgpu::VertexFormat::Float32x2));
        assert_eq!(vertex_format(3), Some(wgpu::VertexFormat::Float32x3));
        assert_eq!(vertex_format(5), None);
    }

    #[test]
    fn test_primitive_count() {
        assert_eq!(primitive_count(PrimitiveTopology::TriangleList, 36), 12);
        assert_eq!(primitive_count(PrimitiveTopology::TriangleStrip, 4), 2);
        assert_eq!(primitive_count(PrimitiveTopology::LineStrip, 0), 0);
    }

    #[test]
    fn test_sampler_without_mipmaps_clamps_to_base_level() {
        let key = SamplerKey {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Nearest,
            wrap: WrapMode::Repeat,
        };
        let desc = key.descriptor();
        assert_eq!(desc.min_filter, wgpu::FilterMode::Nearest);
        assert_eq!(desc.lod_max_clamp, 0.0);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::Repeat);

        let key = SamplerKey {
            min_filter: FilterMode::LinearMipmapLinear,
            ..key
        };
        let desc = key.descriptor();
        assert_eq!(desc.mipmap_filter, wgpu::FilterMode::Linear);
        assert!(desc.lod_max_clamp > 0.0);
    }

    #[test]
    fn test_clear_color() {
        let c: wgpu::Color = Vec4::new(0.0, 0.25, 0.5, 1.0).into_wgpu();
        assert_eq!((c.r, c.g, c.b, c.a), (0.0, 0.25, 0.5, 1.0));
    }
}
