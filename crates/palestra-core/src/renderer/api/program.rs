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

//! Shader program descriptors and the interface a program exposes to the host.

use super::uniform::UniformLayout;

/// A named vertex input of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDecl {
    /// Name used by the host to look the attribute up.
    pub name: String,
    /// `@location` in the vertex shader.
    pub location: u32,
    /// Number of `f32` components.
    pub components: u32,
}

/// A group of attributes fed from the same buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexBufferDecl {
    /// Distance between two vertices, in `f32` elements.
    pub stride: u32,
    /// Attributes and their offsets (in `f32` elements) within one vertex.
    pub attributes: Vec<(AttributeDecl, u32)>,
}

/// A fixed-size array of texture samplers addressed as `name[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerArrayDecl {
    /// Array name, e.g. `tex`.
    pub name: String,
    /// Number of samplers the shader declares.
    pub count: u32,
}

/// Everything the host needs to know about a program without reflecting it.
#[derive(Debug, Clone, Default)]
pub struct ShaderInterface {
    /// Vertex buffer slots, in binding order.
    pub vertex_buffers: Vec<VertexBufferDecl>,
    /// The program's single uniform block.
    pub uniforms: UniformLayout,
    /// Sampler array, if the program samples textures.
    pub samplers: Option<SamplerArrayDecl>,
    /// Float uniform that receives the bound units' LOD bias, if declared.
    pub lod_bias_uniform: Option<String>,
}

impl ShaderInterface {
    /// Finds an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDecl> {
        self.vertex_buffers
            .iter()
            .flat_map(|b| b.attributes.iter().map(|(a, _)| a))
            .find(|a| a.name == name)
    }

    /// Returns the buffer slot an attribute location is fed from.
    pub fn slot_of_location(&self, location: u32) -> Option<usize> {
        self.vertex_buffers
            .iter()
            .position(|b| b.attributes.iter().any(|(a, _)| a.location == location))
    }

    /// Parses `name[i]` against the declared sampler array and returns `i`.
    pub fn sampler_index(&self, uniform_name: &str) -> Option<u32> {
        let samplers = self.samplers.as_ref()?;
        let index = uniform_name
            .strip_prefix(samplers.name.as_str())?
            .strip_prefix('[')?
            .strip_suffix(']')?
            .parse::<u32>()
            .ok()?;
        (index < samplers.count).then_some(index)
    }
}

/// Describes a vertex + fragment program to compile.
#[derive(Debug, Clone, Copy)]
pub struct ProgramDescriptor<'a> {
    /// Debug label, usually the shader file names.
    pub label: &'a str,
    /// WGSL source of the vertex stage.
    pub vertex_source: &'a str,
    /// Entry point of the vertex stage.
    pub vertex_entry_point: &'a str,
    /// WGSL source of the fragment stage.
    pub fragment_source: &'a str,
    /// Entry point of the fragment stage.
    pub fragment_entry_point: &'a str,
    /// The interface both stages agree on.
    pub interface: &'a ShaderInterface,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interface() -> ShaderInterface {
        let attr = |name: &str, location, components| AttributeDecl {
            name: name.to_string(),
            location,
            components,
        };
        ShaderInterface {
            vertex_buffers: vec![
                VertexBufferDecl {
                    stride: 6,
                    attributes: vec![(attr("vert", 0, 3), 0), (attr("vertNormal", 1, 3), 3)],
                },
                VertexBufferDecl {
                    stride: 2,
                    attributes: vec![(attr("vertTexCoord", 2, 2), 0)],
                },
            ],
            samplers: Some(SamplerArrayDecl {
                name: "tex".to_string(),
                count: 4,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_attribute_lookup() {
        let iface = interface();
        assert_eq!(iface.attribute("vertNormal").map(|a| a.location), Some(1));
        assert!(iface.attribute("vertColor").is_none());
        assert_eq!(iface.slot_of_location(2), Some(1));
        assert_eq!(iface.slot_of_location(9), None);
    }

    #[test]
    fn test_sampler_index() {
        let iface = interface();
        assert_eq!(iface.sampler_index("tex[0]"), Some(0));
        assert_eq!(iface.sampler_index("tex[3]"), Some(3));
        assert_eq!(iface.sampler_index("tex[4]"), None);
        assert_eq!(iface.sampler_index("tex"), None);
        assert_eq!(iface.sampler_index("texture[1]"), None);
    }
}
