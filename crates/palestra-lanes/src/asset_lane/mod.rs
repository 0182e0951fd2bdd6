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

//! Asset lane: geometry, file import, texture creation and model building.

mod error;
mod geometry;
mod loading;
mod model_builder;
mod resources;
mod texture;

pub use error::*;
pub use geometry::*;
pub use loading::*;
pub use model_builder::*;
pub use resources::*;
pub use texture::*;
