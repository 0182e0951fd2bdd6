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

//! Vertex attribute bindings and primitive topology.

/// Name of the position attribute every scene program declares.
pub const ATTRIB_POSITION: &str = "vert";
/// Name of the normal attribute every scene program declares.
pub const ATTRIB_NORMAL: &str = "vertNormal";
/// Name of the optional texture-coordinate attribute.
pub const ATTRIB_TEX_COORD: &str = "vertTexCoord";

/// How consecutive vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a point.
    PointList,
    /// Each pair of vertices is a line.
    LineList,
    /// Consecutive vertices form a connected line.
    LineStrip,
    /// Each triple of vertices is a triangle.
    #[default]
    TriangleList,
    /// Each vertex after the second forms a triangle with the previous two.
    TriangleStrip,
}

/// Binds part of a float buffer to one attribute location of a vertex array.
///
/// `stride` and `offset` are measured in `f32` elements, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Attribute location, as returned by `GraphicsDevice::attribute_location`.
    pub location: u32,
    /// Number of floats read for this attribute (1 to 4).
    pub components: u32,
    /// Distance between two consecutive vertices.
    pub stride: u32,
    /// Offset of the attribute inside one vertex.
    pub offset: u32,
}
