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

//! Values that can be uploaded to a named uniform, and the uniform block layout
//! that maps those names to byte offsets.

use std::collections::HashMap;

use crate::math::{Mat4, Vec3, Vec4};

/// The type of a single uniform slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformType {
    /// `f32`
    Float,
    /// `i32`
    Int,
    /// `vec3<f32>`
    Vec3,
    /// `vec4<f32>`
    Vec4,
    /// `mat4x4<f32>`
    Mat4,
}

impl UniformType {
    /// Required alignment in the uniform address space, in bytes.
    pub fn align(self) -> usize {
        match self {
            UniformType::Float | UniformType::Int => 4,
            UniformType::Vec3 | UniformType::Vec4 | UniformType::Mat4 => 16,
        }
    }

    /// Size in bytes.
    pub fn size(self) -> usize {
        match self {
            UniformType::Float | UniformType::Int => 4,
            UniformType::Vec3 => 12,
            UniformType::Vec4 => 16,
            UniformType::Mat4 => 64,
        }
    }
}

/// A value for one named uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// A float scalar.
    Float(f32),
    /// A signed integer scalar. Also used for sampler unit indices.
    Int(i32),
    /// A 3-component vector.
    Vec3(Vec3),
    /// A 4-component vector.
    Vec4(Vec4),
    /// A column-major 4x4 matrix.
    Mat4(Mat4),
}

impl UniformValue {
    /// The slot type this value fits into.
    pub fn uniform_type(&self) -> UniformType {
        match self {
            UniformValue::Float(_) => UniformType::Float,
            UniformValue::Int(_) => UniformType::Int,
            UniformValue::Vec3(_) => UniformType::Vec3,
            UniformValue::Vec4(_) => UniformType::Vec4,
            UniformValue::Mat4(_) => UniformType::Mat4,
        }
    }

    /// Writes the little-endian bytes of the value to the front of `out`.
    ///
    /// # Panics
    /// Panics if `out` is shorter than the value's size.
    pub fn write_bytes(&self, out: &mut [u8]) {
        match self {
            UniformValue::Float(v) => out[..4].copy_from_slice(&v.to_le_bytes()),
            UniformValue::Int(v) => out[..4].copy_from_slice(&v.to_le_bytes()),
            UniformValue::Vec3(v) => out[..12].copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Vec4(v) => out[..16].copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Mat4(m) => out[..64].copy_from_slice(bytemuck::bytes_of(m)),
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(m: Mat4) -> Self {
        UniformValue::Mat4(m)
    }
}

/// Where a named uniform lives inside the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSlot {
    /// Byte offset from the start of the block.
    pub offset: usize,
    /// The slot's type.
    pub ty: UniformType,
}

/// Maps uniform names (`camera`, `fog.color`, `lights[3].position`) to slots in
/// a single uniform block laid out with WGSL uniform address-space rules.
#[derive(Debug, Clone, Default)]
pub struct UniformLayout {
    slots: HashMap<String, UniformSlot>,
    size: usize,
}

impl UniformLayout {
    /// Starts a new layout. Members are placed in the order they are added,
    /// which must match the declaration order of the shader's struct.
    pub fn builder() -> UniformLayoutBuilder {
        UniformLayoutBuilder::default()
    }

    /// Looks up a slot by its full name.
    pub fn slot(&self, name: &str) -> Option<UniformSlot> {
        self.slots.get(name).copied()
    }

    /// Total block size in bytes, rounded up to 16.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of addressable names.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the layout has no members.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[derive(Debug, Clone)]
enum Member {
    Field(String, UniformType),
    Struct {
        name: String,
        fields: Vec<(String, UniformType)>,
        count: Option<usize>,
    },
}

/// Builder for [`UniformLayout`].
#[derive(Debug, Clone, Default)]
pub struct UniformLayoutBuilder {
    members: Vec<Member>,
}

impl UniformLayoutBuilder {
    /// Adds a scalar, vector or matrix member.
    pub fn field(mut self, name: &str, ty: UniformType) -> Self {
        self.members.push(Member::Field(name.to_string(), ty));
        self
    }

    /// Adds a nested struct member addressed as `name.field`.
    pub fn structure(mut self, name: &str, fields: &[(&str, UniformType)]) -> Self {
        self.members.push(Member::Struct {
            name: name.to_string(),
            fields: owned_fields(fields),
            count: None,
        });
        self
    }

    /// Adds a fixed-size array of structs addressed as `name[i].field`.
    pub fn struct_array(mut self, name: &str, count: usize, fields: &[(&str, UniformType)]) -> Self {
        self.members.push(Member::Struct {
            name: name.to_string(),
            fields: owned_fields(fields),
            count: Some(count),
        });
        self
    }

    /// Computes every offset and the block size.
    pub fn build(self) -> UniformLayout {
        let mut slots = HashMap::new();
        let mut cursor = 0usize;

        for member in self.members {
            match member {
                Member::Field(name, ty) => {
                    cursor = round_up(cursor, ty.align());
                    slots.insert(name, UniformSlot { offset: cursor, ty });
                    cursor += ty.size();
                }
                Member::Struct {
                    name,
                    fields,
                    count,
                } => {
                    let (offsets, align, size) = struct_layout(&fields);
                    // Structs and array elements in uniform space start on 16-byte boundaries.
                    let struct_align = align.max(16);
                    let stride = round_up(size, struct_align);
                    cursor = round_up(cursor, struct_align);

                    let prefixes: Vec<String> = match count {
                        None => vec![name.clone()],
                        Some(n) => (0..n).map(|i| format!("{name}[{i}]")).collect(),
                    };
                    for (element, prefix) in prefixes.iter().enumerate() {
                        let base = cursor + element * stride;
                        for ((field, ty), offset) in fields.iter().zip(&offsets) {
                            slots.insert(
                                format!("{prefix}.{field}"),
                                UniformSlot {
                                    offset: base + offset,
                                    ty: *ty,
                                },
                            );
                        }
                    }
                    cursor += stride * prefixes.len();
                }
            }
        }

        UniformLayout {
            slots,
            size: round_up(cursor.max(16), 16),
        }
    }
}

fn owned_fields(fields: &[(&str, UniformType)]) -> Vec<(String, UniformType)> {
    fields.iter().map(|(n, t)| (n.to_string(), *t)).collect()
}

/// Returns member offsets, struct alignment and struct size.
fn struct_layout(fields: &[(String, UniformType)]) -> (Vec<usize>, usize, usize) {
    let mut offsets = Vec::with_capacity(fields.len());
    let mut cursor = 0;
    let mut align = 1;
    for (_, ty) in fields {
        cursor = round_up(cursor, ty.align());
        offsets.push(cursor);
        cursor += ty.size();
        align = align.max(ty.align());
    }
    (offsets, align, round_up(cursor, align))
}

#[inline]
fn round_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}
