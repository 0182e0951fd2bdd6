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

//! Image decoding.

use image::DynamicImage;
use palestra_core::renderer::{ImageData, PixelFormat, TextureError};

use super::{AssetLoaderLane, ImportError};

/// Decodes image files into 8-bit pixels in one of the four supported
/// layouts. Higher bit depths are narrowed to 8 bits per channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureLoaderLane;

impl AssetLoaderLane<ImageData> for TextureLoaderLane {
    fn load(&self, bytes: &[u8]) -> Result<ImageData, ImportError> {
        let img = image::load_from_memory(bytes)?;
        Ok(to_image_data(img)?)
    }
}

fn to_image_data(img: DynamicImage) -> Result<ImageData, TextureError> {
    let (width, height) = (img.width(), img.height());
    let color = img.color();
    let format = PixelFormat::from_channels(color.channel_count() as usize)
        .map_err(|_| TextureError::UnsupportedFormat(format!("{color:?}")))?;

    let pixels = match format {
        PixelFormat::Grayscale => img.into_luma8().into_raw(),
        PixelFormat::GrayscaleAlpha => img.into_luma_alpha8().into_raw(),
        PixelFormat::Rgb => img.into_rgb8().into_raw(),
        PixelFormat::Rgba => img.into_rgba8().into_raw(),
    };
    ImageData::new(width, height, format, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode_png(img: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_rgb_png() {
        let img = RgbImage::from_pixel(4, 2, Rgb([10, 20, 30]));
        let data = TextureLoaderLane
            .load(&encode_png(DynamicImage::ImageRgb8(img)))
            .unwrap();
        assert_eq!((data.width, data.height), (4, 2));
        assert_eq!(data.format, PixelFormat::Rgb);
        assert_eq!(&data.pixels[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_decode_grayscale_png() {
        let img = GrayImage::new(3, 3);
        let data = TextureLoaderLane
            .load(&encode_png(DynamicImage::ImageLuma8(img)))
            .unwrap();
        assert_eq!(data.format, PixelFormat::Grayscale);
        assert_eq!(data.pixels.len(), 9);
    }

    #[test]
    fn test_sixteen_bit_is_narrowed() {
        let img = DynamicImage::new_rgba16(2, 2);
        let data = to_image_data(img).unwrap();
        assert_eq!(data.format, PixelFormat::Rgba);
        assert_eq!(data.pixels.len(), 16);
    }

    #[test]
    fn test_garbage_is_an_image_error() {
        assert!(matches!(
            TextureLoaderLane.load(b"not an image"),
            Err(ImportError::Image(_))
        ));
    }
}
