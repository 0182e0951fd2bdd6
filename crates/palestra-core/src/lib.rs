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

//! # Palestra Core
//!
//! Foundational crate of the Palestra renderer. It owns the math primitives,
//! the renderer contracts (`GraphicsDevice`, `CommandRecorder`, `RenderSystem`)
//! that the backend implements and the lanes drive, and the plain data types
//! (lights, fog, render parameters) that flow between them.

#![warn(missing_docs)]

pub mod math;
pub mod platform;
pub mod renderer;
