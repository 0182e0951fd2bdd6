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

//! Backend-agnostic data types used to talk to the graphics device.

pub mod params;
pub mod program;
pub mod resource;
pub mod texture;
pub mod uniform;
pub mod vertex;

pub use self::params::{Fog, FogEquation, RenderParams};
pub use self::program::{
    AttributeDecl, ProgramDescriptor, SamplerArrayDecl, ShaderInterface, VertexBufferDecl,
};
pub use self::resource::{BufferId, ProgramId, TextureId, VertexArrayId};
pub use self::texture::{
    CubeMapDescriptor, FilterMode, ImageData, MipLevel, PixelFormat, SamplerState, Texture,
    Texture2dDescriptor, WrapMode,
};
pub use self::uniform::{UniformLayout, UniformLayoutBuilder, UniformSlot, UniformType, UniformValue};
pub use self::vertex::{
    PrimitiveTopology, VertexAttribute, ATTRIB_NORMAL, ATTRIB_POSITION, ATTRIB_TEX_COORD,
};
