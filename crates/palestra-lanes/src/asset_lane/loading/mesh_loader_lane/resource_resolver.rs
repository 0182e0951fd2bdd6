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

//! Resolution of files referenced from inside a model (MTL libraries, glTF
//! buffers).

use crate::asset_lane::ImportError;

/// Resolves a URI found inside a model file to its bytes.
pub trait ResourceResolver: Send + Sync {
    /// Reads the resource at `uri`, relative to the model's directory.
    fn resolve_bytes(&self, uri: &str) -> Result<Vec<u8>, ImportError>;
}
