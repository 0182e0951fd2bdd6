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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::renderer::api::PixelFormat;
use std::fmt;

/// An error raised while loading or compiling a shader program.
#[derive(Debug)]
pub enum ShaderError {
    /// The shader source could not be read from disk.
    LoadError {
        /// The path of the file that failed to load.
        path: String,
        /// The underlying I/O error, rendered as text.
        source_error: String,
    },
    /// The backend rejected the shader source.
    CompilationError {
        /// A descriptive label for the program.
        label: String,
        /// Detailed error messages from the shader compiler.
        details: String,
    },
    /// The shader source does not expose the requested entry point.
    InvalidEntryPoint {
        /// A descriptive label for the program.
        label: String,
        /// The entry point name that was not found.
        entry_point: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::LoadError { path, source_error } => {
                write!(f, "Failed to load shader source from '{path}': {source_error}")
            }
            ShaderError::CompilationError { label, details } => {
                write!(f, "Shader compilation failed for '{label}': {details}")
            }
            ShaderError::InvalidEntryPoint { label, entry_point } => {
                write!(f, "Invalid entry point '{entry_point}' for program '{label}'")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error raised while building a texture from pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// The pixel layout does not map to one of the supported [`PixelFormat`]s.
    UnsupportedFormat(String),
    /// Width or height is zero.
    InvalidDimensions {
        /// The requested width.
        width: u32,
        /// The requested height.
        height: u32,
    },
    /// The pixel buffer length does not match `width * height * channels`.
    DataSizeMismatch {
        /// The format the pixels were declared with.
        format: PixelFormat,
        /// Expected byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::UnsupportedFormat(what) => {
                write!(f, "Unrecognised pixel format: {what}")
            }
            TextureError::InvalidDimensions { width, height } => {
                write!(f, "Invalid texture dimensions {width}x{height}")
            }
            TextureError::DataSizeMismatch {
                format,
                expected,
                actual,
            } => write!(
                f,
                "Pixel data for {format:?} should be {expected} bytes, got {actual}"
            ),
        }
    }
}

impl std::error::Error for TextureError {}

/// An error related to the creation or use of a GPU resource.
#[derive(Debug)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// A texture-specific error occurred.
    Texture(TextureError),
    /// The handle or ID used to reference a resource is unknown to the device.
    InvalidHandle(String),
    /// A vertex attribute name is not declared by the program's interface.
    UnknownAttribute(String),
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::Texture(err) => write!(f, "Texture resource error: {err}"),
            ResourceError::InvalidHandle(what) => write!(f, "Invalid resource handle: {what}"),
            ResourceError::UnknownAttribute(name) => {
                write!(f, "Vertex attribute '{name}' is not part of the program interface")
            }
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            ResourceError::Texture(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

impl From<TextureError> for ResourceError {
    fn from(err: TextureError) -> Self {
        ResourceError::Texture(err)
    }
}

/// A high-level error raised by the render system.
#[derive(Debug)]
pub enum RenderError {
    /// An operation was attempted before the rendering system was initialized.
    NotInitialized,
    /// A failure occurred during the initialization of the graphics backend.
    InitializationFailed(String),
    /// Failed to acquire the next frame from the surface.
    SurfaceAcquisitionFailed(String),
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotInitialized => write!(f, "The rendering system is not initialized."),
            RenderError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize graphics backend: {msg}")
            }
            RenderError::SurfaceAcquisitionFailed(msg) => {
                write!(f, "Failed to acquire surface for rendering: {msg}")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_shader_error_display() {
        let err = ShaderError::LoadError {
            path: "resources/scene.vert.wgsl".to_string(),
            source_error: "No such file".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to load shader source from 'resources/scene.vert.wgsl': No such file"
        );
    }

    #[test]
    fn test_texture_error_display() {
        let err = TextureError::UnsupportedFormat("5 channels".to_string());
        assert_eq!(err.to_string(), "Unrecognised pixel format: 5 channels");
    }

    #[test]
    fn test_resource_error_chains_source() {
        let err = ResourceError::from(TextureError::InvalidDimensions {
            width: 0,
            height: 4,
        });
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Texture resource error: Invalid texture dimensions 0x4"
        );
    }

    #[test]
    fn test_render_error_from_resource_error() {
        let err: RenderError = ResourceError::BackendError("lost".to_string()).into();
        assert!(matches!(err, RenderError::ResourceError(_)));
        assert_eq!(
            err.to_string(),
            "Graphics resource operation failed: Backend-specific resource error: lost"
        );
    }
}
