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

//! Locates the files the demo loads at startup.

use std::path::{Path, PathBuf};

use super::ImportError;
use super::ResourceResolver;

/// Name of the directory, beside the executable, that holds every resource.
pub const RESOURCES_DIR: &str = "resources";

/// Resolves resource file names against one root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    root: PathBuf,
}

impl ResourceLocator {
    /// Uses `root` as the resource directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Uses the `resources` directory next to the running executable.
    pub fn beside_executable() -> std::io::Result<Self> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::new(dir.join(RESOURCES_DIR)))
    }

    /// The resource directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of `file_name` inside the resource directory.
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Reads a resource as bytes.
    pub fn read(&self, file_name: &str) -> Result<Vec<u8>, ImportError> {
        let path = self.resolve(file_name);
        std::fs::read(&path).map_err(|source| ImportError::Io { path, source })
    }

    /// Reads a resource as UTF-8 text.
    pub fn read_to_string(&self, file_name: &str) -> Result<String, ImportError> {
        let path = self.resolve(file_name);
        std::fs::read_to_string(&path).map_err(|source| ImportError::Io { path, source })
    }
}

impl ResourceResolver for ResourceLocator {
    fn resolve_bytes(&self, uri: &str) -> Result<Vec<u8>, ImportError> {
        self.read(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_and_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scene.vert.wgsl"), "// vs").unwrap();

        let locator = ResourceLocator::new(dir.path());
        assert_eq!(locator.resolve("wall.jpg"), dir.path().join("wall.jpg"));
        assert_eq!(locator.read_to_string("scene.vert.wgsl").unwrap(), "// vs");
        assert!(matches!(
            locator.read("missing.obj"),
            Err(ImportError::Io { .. })
        ));
    }

    #[test]
    fn test_beside_executable_ends_in_resources() {
        let locator = ResourceLocator::beside_executable().unwrap();
        assert!(locator.root().ends_with(RESOURCES_DIR));
    }
}
