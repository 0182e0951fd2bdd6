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

use std::path::PathBuf;

use palestra_core::renderer::{ResourceError, ShaderError, TextureError};
use palestra_data::SceneError;
use thiserror::Error;

/// Errors raised while decoding files into CPU-side data.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// No loader handles this file extension.
    #[error("unsupported model format '{0}'")]
    UnsupportedExtension(String),
    /// The OBJ parser rejected the file.
    #[error("failed to parse OBJ: {0}")]
    Obj(#[from] tobj::LoadError),
    /// The glTF parser rejected the file.
    #[error("failed to parse glTF: {0}")]
    Gltf(#[from] gltf::Error),
    /// A buffer referenced by the model could not be resolved.
    #[error("failed to resolve '{uri}': {reason}")]
    Resource {
        /// The URI as written in the model file.
        uri: String,
        /// What went wrong.
        reason: String,
    },
    /// The file parsed but lacks required data.
    #[error("malformed model: {0}")]
    Malformed(String),
    /// The image decoder rejected the file.
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    /// The decoded pixel layout is not one the renderer understands.
    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// Errors raised while building model assets.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A shader file could not be read or compiled.
    #[error("shader program '{label}' failed: {source}")]
    Shader {
        /// The vertex/fragment pair, as `vs + fs`.
        label: String,
        /// The underlying error.
        #[source]
        source: ShaderError,
    },
    /// The device rejected a resource.
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// A texture file could not be loaded.
    #[error("texture '{file}' failed: {source}")]
    Texture {
        /// The image file name.
        file: String,
        /// The underlying error.
        #[source]
        source: ImportError,
    },
    /// The UV array does not hold two floats per vertex.
    #[error("expected {expected} texture coordinates, got {actual}")]
    UvCountMismatch {
        /// `2 * draw_count`.
        expected: usize,
        /// Length of the supplied array.
        actual: usize,
    },
    /// The program declares no attribute the mesh data needs.
    #[error("program '{program}' has no attribute '{attribute}'")]
    MissingAttribute {
        /// The vertex/fragment pair.
        program: String,
        /// The attribute name.
        attribute: &'static str,
    },
    /// A scene lookup failed (bad mesh index, empty asset).
    #[error(transparent)]
    Scene(#[from] SceneError),
}

impl From<ShaderError> for BuildError {
    fn from(source: ShaderError) -> Self {
        let label = match &source {
            ShaderError::LoadError { path, .. } => path.clone(),
            ShaderError::CompilationError { label, .. }
            | ShaderError::InvalidEntryPoint { label, .. } => label.clone(),
        };
        BuildError::Shader { label, source }
    }
}
