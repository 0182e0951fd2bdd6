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

//! Texture formats, filtering, wrapping and the CPU-side pixel containers
//! handed to the device.

use serde::{Deserialize, Serialize};

use super::resource::TextureId;
use crate::renderer::error::TextureError;

/// The channel layout of decoded 8-bit pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// One luminance channel.
    Grayscale,
    /// Luminance plus alpha.
    GrayscaleAlpha,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl PixelFormat {
    /// Number of 8-bit channels per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Grayscale => 1,
            PixelFormat::GrayscaleAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    /// Maps a channel count to a format.
    ///
    /// # Errors
    /// Any count other than 1 to 4 is an [`TextureError::UnsupportedFormat`].
    pub fn from_channels(channels: usize) -> Result<Self, TextureError> {
        match channels {
            1 => Ok(PixelFormat::Grayscale),
            2 => Ok(PixelFormat::GrayscaleAlpha),
            3 => Ok(PixelFormat::Rgb),
            4 => Ok(PixelFormat::Rgba),
            n => Err(TextureError::UnsupportedFormat(format!("{n} channels"))),
        }
    }

    /// Expands `pixels` to tightly packed RGBA8.
    ///
    /// Grayscale is replicated into the color channels; missing alpha becomes 255.
    pub fn expand_to_rgba8(self, pixels: &[u8]) -> Vec<u8> {
        let channels = self.channels();
        let mut out = Vec::with_capacity(pixels.len() / channels * 4);
        for px in pixels.chunks_exact(channels) {
            let rgba = match self {
                PixelFormat::Grayscale => [px[0], px[0], px[0], 255],
                PixelFormat::GrayscaleAlpha => [px[0], px[0], px[0], px[1]],
                PixelFormat::Rgb => [px[0], px[1], px[2], 255],
                PixelFormat::Rgba => [px[0], px[1], px[2], px[3]],
            };
            out.extend_from_slice(&rgba);
        }
        out
    }
}

/// A texture filter, including the combined mipmap variants.
///
/// The plain variants are valid for both magnification and minification; the
/// `*Mipmap*` variants only make sense for minification and degrade to their
/// base filter when used for magnification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// Nearest texel.
    Nearest,
    /// Bilinear filtering.
    #[default]
    Linear,
    /// Nearest texel from the nearest mip level.
    NearestMipmapNearest,
    /// Bilinear filtering on the nearest mip level.
    LinearMipmapNearest,
    /// Nearest texel, blended between two mip levels.
    NearestMipmapLinear,
    /// Trilinear filtering.
    LinearMipmapLinear,
}

impl FilterMode {
    /// The texel filter without its mip component.
    pub fn base(self) -> FilterMode {
        match self {
            FilterMode::Nearest | FilterMode::NearestMipmapNearest | FilterMode::NearestMipmapLinear => {
                FilterMode::Nearest
            }
            FilterMode::Linear | FilterMode::LinearMipmapNearest | FilterMode::LinearMipmapLinear => {
                FilterMode::Linear
            }
        }
    }

    /// The filter used between mip levels, or `None` when mipmaps are ignored.
    pub fn mipmap(self) -> Option<FilterMode> {
        match self {
            FilterMode::Nearest | FilterMode::Linear => None,
            FilterMode::NearestMipmapNearest | FilterMode::LinearMipmapNearest => {
                Some(FilterMode::Nearest)
            }
            FilterMode::NearestMipmapLinear | FilterMode::LinearMipmapLinear => {
                Some(FilterMode::Linear)
            }
        }
    }
}

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WrapMode {
    /// Tile the texture.
    Repeat,
    /// Tile the texture, mirroring every other tile.
    MirroredRepeat,
    /// Clamp to the edge texel.
    #[default]
    ClampToEdge,
}

/// Per-unit sampling state applied when a texture is bound for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SamplerState {
    /// Filter used when the texture is magnified.
    pub mag_filter: FilterMode,
    /// Filter used when the texture is minified.
    pub min_filter: FilterMode,
    /// Bias added to the computed level of detail.
    pub lod_bias: f32,
}

/// One level of a mip chain, tightly packed in the owning texture's format.
#[derive(Debug, Clone, PartialEq)]
pub struct MipLevel {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes, row-major, first row first.
    pub pixels: Vec<u8>,
}

/// Decoded pixels plus their layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channel layout of `pixels`.
    pub format: PixelFormat,
    /// Pixel bytes, row-major.
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Wraps raw pixels after checking that the buffer matches the dimensions.
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * format.channels();
        if pixels.len() != expected {
            return Err(TextureError::DataSizeMismatch {
                format,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    /// Reverses the row order in place, so the last row becomes the first.
    pub fn flip_vertically(&mut self) {
        let row = self.width as usize * self.format.channels();
        let rows = self.height as usize;
        for y in 0..rows / 2 {
            let (top, bottom) = self.pixels.split_at_mut((rows - 1 - y) * row);
            top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
        }
    }
}

/// Describes a 2D texture to create. `levels[0]` is the full-size image.
#[derive(Debug, Clone)]
pub struct Texture2dDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// Channel layout of every level.
    pub format: PixelFormat,
    /// Combined min/mag filter the texture is created with.
    pub filter: FilterMode,
    /// Wrap mode on both axes.
    pub wrap: WrapMode,
    /// Mip chain, largest first.
    pub levels: &'a [MipLevel],
}

/// Describes an empty six-face cube map.
#[derive(Debug, Clone, Copy)]
pub struct CubeMapDescriptor<'a> {
    /// Debug label.
    pub label: Option<&'a str>,
    /// Edge length of every face.
    pub size: u32,
    /// Channel layout of every face.
    pub format: PixelFormat,
    /// Minification filter.
    pub min_filter: FilterMode,
    /// Magnification filter.
    pub mag_filter: FilterMode,
    /// Wrap mode on all three axes.
    pub wrap: WrapMode,
}

/// A GPU-resident texture and the size of the image it was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texture {
    /// The device handle.
    pub id: TextureId,
    /// Width of the source image, in pixels.
    pub original_width: f32,
    /// Height of the source image, in pixels.
    pub original_height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_from_channels() {
        assert_eq!(PixelFormat::from_channels(1), Ok(PixelFormat::Grayscale));
        assert_eq!(PixelFormat::from_channels(4), Ok(PixelFormat::Rgba));
        assert!(matches!(
            PixelFormat::from_channels(5),
            Err(TextureError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_expand_to_rgba8() {
        assert_eq!(PixelFormat::Grayscale.expand_to_rgba8(&[7]), vec![7, 7, 7, 255]);
        assert_eq!(
            PixelFormat::GrayscaleAlpha.expand_to_rgba8(&[7, 9]),
            vec![7, 7, 7, 9]
        );
        assert_eq!(
            PixelFormat::Rgb.expand_to_rgba8(&[1, 2, 3, 4, 5, 6]),
            vec![1, 2, 3, 255, 4, 5, 6, 255]
        );
    }

    #[test]
    fn test_filter_mode_split() {
        assert_eq!(FilterMode::LinearMipmapNearest.base(), FilterMode::Linear);
        assert_eq!(
            FilterMode::LinearMipmapNearest.mipmap(),
            Some(FilterMode::Nearest)
        );
        assert_eq!(FilterMode::Nearest.mipmap(), None);
    }

    #[test]
    fn test_image_data_rejects_wrong_size() {
        let err = ImageData::new(2, 2, PixelFormat::Rgb, vec![0; 11]).unwrap_err();
        assert_eq!(
            err,
            TextureError::DataSizeMismatch {
                format: PixelFormat::Rgb,
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn test_flip_vertically() {
        let mut img = ImageData::new(1, 3, PixelFormat::Grayscale, vec![1, 2, 3]).unwrap();
        img.flip_vertically();
        assert_eq!(img.pixels, vec![3, 2, 1]);

        let mut img = ImageData::new(2, 2, PixelFormat::GrayscaleAlpha, (0..8).collect()).unwrap();
        img.flip_vertically();
        assert_eq!(img.pixels, vec![4, 5, 6, 7, 0, 1, 2, 3]);
    }
}
