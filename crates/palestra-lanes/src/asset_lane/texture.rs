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

//! GPU texture creation from decoded images, with a CPU-built mip chain.

use image::imageops::FilterType;
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use palestra_core::renderer::{
    CubeMapDescriptor, FilterMode, GraphicsDevice, ImageData, MipLevel, PixelFormat,
    ResourceError, Texture, Texture2dDescriptor, TextureError, WrapMode,
};

/// Edge length of the cube-map placeholder faces.
pub const CUBE_MAP_SIZE: u32 = 64;

/// Number of levels in a full mip chain for a `width` x `height` image.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Builds every mip level of `image`, halving each dimension (never below 1)
/// down to 1x1. Level 0 is the image itself.
pub fn build_mip_chain(image: &ImageData) -> Result<Vec<MipLevel>, TextureError> {
    let base = to_dynamic(image)?;
    let count = mip_level_count(image.width, image.height);
    let mut levels = Vec::with_capacity(count as usize);
    levels.push(MipLevel {
        width: image.width,
        height: image.height,
        pixels: image.pixels.clone(),
    });

    let (mut width, mut height) = (image.width, image.height);
    for _ in 1..count {
        width = (width / 2).max(1);
        height = (height / 2).max(1);
        let level = base.resize_exact(width, height, FilterType::Triangle);
        levels.push(MipLevel {
            width,
            height,
            pixels: level.into_bytes(),
        });
    }
    Ok(levels)
}

fn to_dynamic(image: &ImageData) -> Result<DynamicImage, TextureError> {
    let (w, h) = (image.width, image.height);
    let pixels = image.pixels.clone();
    let dynamic = match image.format {
        PixelFormat::Grayscale => GrayImage::from_raw(w, h, pixels).map(DynamicImage::ImageLuma8),
        PixelFormat::GrayscaleAlpha => {
            GrayAlphaImage::from_raw(w, h, pixels).map(DynamicImage::ImageLumaA8)
        }
        PixelFormat::Rgb => RgbImage::from_raw(w, h, pixels).map(DynamicImage::ImageRgb8),
        PixelFormat::Rgba => RgbaImage::from_raw(w, h, pixels).map(DynamicImage::ImageRgba8),
    };
    dynamic.ok_or(TextureError::DataSizeMismatch {
        format: image.format,
        expected: w as usize * h as usize * image.format.channels(),
        actual: image.pixels.len(),
    })
}

/// Flips `image`, uploads it with a full mip chain and returns the handle
/// plus the source dimensions.
pub fn create_texture(
    device: &dyn GraphicsDevice,
    label: &str,
    mut image: ImageData,
    filter: FilterMode,
    wrap: WrapMode,
) -> Result<Texture, ResourceError> {
    image.flip_vertically();
    let levels = build_mip_chain(&image)?;
    let id = device.create_texture_2d(&Texture2dDescriptor {
        label: Some(label),
        format: image.format,
        filter,
        wrap,
        levels: &levels,
    })?;
    log::debug!(
        "Created texture '{label}' ({}x{}, {:?}, {} levels)",
        image.width,
        image.height,
        image.format,
        levels.len()
    );
    Ok(Texture {
        id,
        original_width: image.width as f32,
        original_height: image.height as f32,
    })
}

/// Creates an empty 64x64 RGB cube map for environment-mapping experiments.
pub fn create_cube_map_placeholder(device: &dyn GraphicsDevice) -> Result<Texture, ResourceError> {
    let id = device.create_cube_map(&CubeMapDescriptor {
        label: Some("cube map placeholder"),
        size: CUBE_MAP_SIZE,
        format: PixelFormat::Rgb,
        min_filter: FilterMode::LinearMipmapLinear,
        mag_filter: FilterMode::Linear,
        wrap: WrapMode::Repeat,
    })?;
    Ok(Texture {
        id,
        original_width: CUBE_MAP_SIZE as f32,
        original_height: CUBE_MAP_SIZE as f32,
    })
}
