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

//! The scene program's interface: file names, entry points, attribute and
//! uniform names, and the uniform block layout the WGSL sources declare.

use palestra_core::renderer::{
    AttributeDecl, SamplerArrayDecl, ShaderInterface, UniformLayout, UniformType,
    VertexBufferDecl, ATTRIB_NORMAL, ATTRIB_POSITION, ATTRIB_TEX_COORD,
};

/// Vertex stage source file.
pub const SCENE_VERTEX_SHADER: &str = "scene.vert.wgsl";
/// Fragment stage source file.
pub const SCENE_FRAGMENT_SHADER: &str = "scene.frag.wgsl";
/// Vertex stage entry point.
pub const VERTEX_ENTRY_POINT: &str = "vs_main";
/// Fragment stage entry point.
pub const FRAGMENT_ENTRY_POINT: &str = "fs_main";

/// Capacity of the `lights` uniform array.
pub const MAX_LIGHTS: usize = 16;
/// Capacity of the `tex` sampler array.
pub const MAX_TEXTURES: usize = 4;

/// Name of the sampler array.
pub const SAMPLER_ARRAY: &str = "tex";

/// `camera`
pub const U_CAMERA: &str = "camera";
/// `model`
pub const U_MODEL: &str = "model";
/// `cameraPosition`
pub const U_CAMERA_POSITION: &str = "cameraPosition";
/// `useTexture`
pub const U_USE_TEXTURE: &str = "useTexture";
/// `numTextures`
pub const U_NUM_TEXTURES: &str = "numTextures";
/// `texLodBias`
pub const U_TEX_LOD_BIAS: &str = "texLodBias";
/// `materialAmbientColor`
pub const U_MATERIAL_AMBIENT: &str = "materialAmbientColor";
/// `materialDiffuseColor`
pub const U_MATERIAL_DIFFUSE: &str = "materialDiffuseColor";
/// `materialSpecularColor`
pub const U_MATERIAL_SPECULAR: &str = "materialSpecularColor";
/// `materialShininess`
pub const U_MATERIAL_SHININESS: &str = "materialShininess";
/// `numLights`
pub const U_NUM_LIGHTS: &str = "numLights";
/// `fog.color`
pub const U_FOG_COLOR: &str = "fog.color";
/// `fog.density`
pub const U_FOG_DENSITY: &str = "fog.density";
/// `fog.eq`
pub const U_FOG_EQUATION: &str = "fog.eq";
/// `fog.start`
pub const U_FOG_START: &str = "fog.start";
/// `fog.end`
pub const U_FOG_END: &str = "fog.end";

/// Fields of one element of the `lights` array, in declaration order.
pub const LIGHT_FIELDS: [(&str, UniformType); 6] = [
    ("position", UniformType::Vec4),
    ("intensities", UniformType::Vec3),
    ("attenuation", UniformType::Float),
    ("ambientCoefficient", UniformType::Float),
    ("coneAngle", UniformType::Float),
    ("coneDirection", UniformType::Vec3),
];

const FOG_FIELDS: [(&str, UniformType); 5] = [
    ("color", UniformType::Vec4),
    ("density", UniformType::Float),
    ("eq", UniformType::Int),
    ("start", UniformType::Float),
    ("end", UniformType::Float),
];

/// The interface shared by `scene.vert.wgsl` and `scene.frag.wgsl`.
///
/// Buffer slot 0 carries position + normal (6 floats), slot 1 carries the
/// optional texture coordinates (2 floats).
pub fn scene_interface() -> ShaderInterface {
    let attr = |name: &str, location, components| AttributeDecl {
        name: name.to_string(),
        location,
        components,
    };

    let uniforms = UniformLayout::builder()
        .field(U_CAMERA, UniformType::Mat4)
        .field(U_MODEL, UniformType::Mat4)
        .field(U_MATERIAL_AMBIENT, UniformType::Vec4)
        .field(U_MATERIAL_DIFFUSE, UniformType::Vec4)
        .field(U_MATERIAL_SPECULAR, UniformType::Vec4)
        .field(U_MATERIAL_SHININESS, UniformType::Float)
        .field(U_USE_TEXTURE, UniformType::Float)
        .field(U_NUM_TEXTURES, UniformType::Int)
        .field(U_NUM_LIGHTS, UniformType::Int)
        .field(U_CAMERA_POSITION, UniformType::Vec3)
        .field(U_TEX_LOD_BIAS, UniformType::Float)
        .structure("fog", &FOG_FIELDS)
        .struct_array("lights", MAX_LIGHTS, &LIGHT_FIELDS)
        .build();

    ShaderInterface {
        vertex_buffers: vec![
            VertexBufferDecl {
                stride: 6,
                attributes: vec![
                    (attr(ATTRIB_POSITION, 0, 3), 0),
                    (attr(ATTRIB_NORMAL, 1, 3), 3),
                ],
            },
            VertexBufferDecl {
                stride: 2,
                attributes: vec![(attr(ATTRIB_TEX_COORD, 2, 2), 0)],
            },
        ],
        uniforms,
        samplers: Some(SamplerArrayDecl {
            name: SAMPLER_ARRAY.to_string(),
            count: MAX_TEXTURES as u32,
        }),
        lod_bias_uniform: Some(U_TEX_LOD_BIAS.to_string()),
    }
}
