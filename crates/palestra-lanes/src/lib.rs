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

//! # Palestra Lanes
//!
//! The two hot paths of the demo: the asset lane, which turns files on disk
//! into GPU-backed [`ModelAsset`](palestra_data::assets::ModelAsset)s, and the
//! render lane, which walks the scene every frame and drives a
//! [`CommandRecorder`](palestra_core::renderer::CommandRecorder).

#![warn(missing_docs)]

pub mod asset_lane;
pub mod render_lane;
