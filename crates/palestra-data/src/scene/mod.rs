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

//! Placed objects, the camera, and the container that owns them.

mod camera;
mod instance;

pub use self::camera::Camera;
pub use self::instance::{default_lights, ModelInstance, STROBE_OFF, STROBE_ON};

use crate::assets::ModelAsset;
use crate::error::SceneError;

/// Index of a [`ModelAsset`] inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetHandle(pub usize);

/// Everything drawn each frame: shared assets, the instances placing them,
/// and the camera looking at them.
#[derive(Debug, Default)]
pub struct Scene {
    assets: Vec<ModelAsset>,
    instances: Vec<ModelInstance>,
    camera: Camera,
}

impl Scene {
    /// Creates an empty scene looking through `camera`.
    pub fn new(camera: Camera) -> Self {
        Self {
            assets: Vec::new(),
            instances: Vec::new(),
            camera,
        }
    }

    /// Stores an asset and returns the handle instances use to share it.
    pub fn add_asset(&mut self, asset: ModelAsset) -> AssetHandle {
        self.assets.push(asset);
        AssetHandle(self.assets.len() - 1)
    }

    /// Looks an asset up.
    pub fn asset(&self, handle: AssetHandle) -> Result<&ModelAsset, SceneError> {
        self.assets
            .get(handle.0)
            .ok_or(SceneError::UnknownAsset(handle))
    }

    /// Looks an asset up for modification (e.g. a texture swap).
    pub fn asset_mut(&mut self, handle: AssetHandle) -> Result<&mut ModelAsset, SceneError> {
        self.assets
            .get_mut(handle.0)
            .ok_or(SceneError::UnknownAsset(handle))
    }

    /// Appends an instance; instances are drawn in the order they are added.
    ///
    /// # Errors
    /// [`SceneError::UnknownAsset`] if the instance refers to an asset this
    /// scene does not own.
    pub fn add_instance(&mut self, instance: ModelInstance) -> Result<usize, SceneError> {
        if instance.asset.0 >= self.assets.len() {
            return Err(SceneError::UnknownAsset(instance.asset));
        }
        self.instances.push(instance);
        Ok(self.instances.len() - 1)
    }

    /// All instances, in draw order.
    pub fn instances(&self) -> &[ModelInstance] {
        &self.instances
    }

    /// The camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The camera, mutable.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Splits the scene for drawing: assets and camera are read while the
    /// instances' strobe state advances.
    pub fn render_view(&mut self) -> (&[ModelAsset], &mut [ModelInstance], &Camera) {
        (&self.assets, &mut self.instances, &self.camera)
    }
}
