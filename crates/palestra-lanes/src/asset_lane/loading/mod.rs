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

//! CPU-side decoding lanes: bytes in, engine-ready data out.

mod mesh_loader_lane;
mod texture_loader_lane;

pub use mesh_loader_lane::*;
pub use texture_loader_lane::*;

use super::ImportError;

/// A lane that parses raw file bytes into an asset of type `T`.
///
/// Implementors do the potentially expensive parsing and decoding work; they
/// never touch the GPU.
pub trait AssetLoaderLane<T> {
    /// Parses `bytes` into a `T`.
    fn load(&self, bytes: &[u8]) -> Result<T, ImportError>;
}
