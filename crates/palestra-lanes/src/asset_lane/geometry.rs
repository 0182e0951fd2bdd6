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

//! Procedural unit cube: 36 vertices spanning `[-1, 1]^3`, two triangles per
//! face, laid out as position + normal (6 floats per vertex).

use palestra_core::math::Vec3;

/// Number of vertices in a cube (6 faces x 2 triangles x 3 vertices).
pub const CUBE_VERTEX_COUNT: u32 = 36;

/// Floats per vertex in a mesh's main buffer: position then normal.
pub const FLOATS_PER_VERTEX: usize = 6;

/// Which way a cube's normals point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Normals point away from the center; the cube is seen from outside.
    Outward,
    /// Normals point towards the center; the cube encloses the viewer.
    Inward,
}

struct Face {
    normal: [f32; 3],
    /// Axes (0 = x, 1 = y, 2 = z) mapped to `u` and `v`.
    uv_axes: (usize, usize),
    corners: [[f32; 3]; 6],
}

static FACES: [Face; 6] = [
    // bottom
    Face {
        normal: [0.0, -1.0, 0.0],
        uv_axes: (0, 2),
        corners: [
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, -1.0],
            [1.0, -1.0, 1.0],
            [-1.0, -1.0, 1.0],
        ],
    },
    // top
    Face {
        normal: [0.0, 1.0, 0.0],
        uv_axes: (0, 2),
        corners: [
            [-1.0, 1.0, -1.0],
            [-1.0, 1.0, 1.0],
            [1.0, 1.0, -1.0],
            [1.0, 1.0, -1.0],
            [-1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
        ],
    },
    // front
    Face {
        normal: [0.0, 0.0, 1.0],
        uv_axes: (0, 1),
        corners: [
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [-1.0, 1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ],
    },
    // back
    Face {
        normal: [0.0, 0.0, -1.0],
        uv_axes: (0, 1),
        corners: [
            [-1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [1.0, 1.0, -1.0],
        ],
    },
    // left
    Face {
        normal: [-1.0, 0.0, 0.0],
        uv_axes: (2, 1),
        corners: [
            [-1.0, -1.0, 1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [-1.0, 1.0, 1.0],
            [-1.0, 1.0, -1.0],
        ],
    },
    // right
    Face {
        normal: [1.0, 0.0, 0.0],
        uv_axes: (2, 1),
        corners: [
            [1.0, -1.0, 1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, -1.0],
            [1.0, 1.0, 1.0],
        ],
    },
];

/// Corner order for one triangle; inward cubes reverse the winding.
fn triangle_order(facing: Facing) -> [usize; 3] {
    match facing {
        Facing::Outward => [0, 1, 2],
        Facing::Inward => [0, 2, 1],
    }
}

fn corners(facing: Facing) -> impl Iterator<Item = (&'static Face, [f32; 3])> {
    let order = triangle_order(facing);
    FACES.iter().flat_map(move |face| {
        face.corners
            .chunks_exact(3)
            .flat_map(move |tri| order.map(|i| (face, tri[i])))
    })
}

/// Interleaved position + normal data for the unit cube.
pub fn cube_vertices(facing: Facing) -> Vec<f32> {
    let sign = match facing {
        Facing::Outward => 1.0,
        Facing::Inward => -1.0,
    };
    let mut out = Vec::with_capacity(CUBE_VERTEX_COUNT as usize * FLOATS_PER_VERTEX);
    for (face, p) in corners(facing) {
        let n = Vec3::from(face.normal) * sign;
        out.extend_from_slice(&p);
        out.extend_from_slice(&n.to_array());
    }
    out
}

/// Texture coordinates matching [`cube_vertices`] with the same facing, one
/// `[0, 1]^2` square per face.
pub fn cube_tex_coords(facing: Facing) -> Vec<f32> {
    let mut out = Vec::with_capacity(CUBE_VERTEX_COUNT as usize * 2);
    for (face, p) in corners(facing) {
        let (u, v) = face.uv_axes;
        out.push((p[u] + 1.0) * 0.5);
        out.push((p[v] + 1.0) * 0.5);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertices(data: &[f32]) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        data.chunks_exact(FLOATS_PER_VERTEX).map(|v| {
            (
                Vec3::new(v[0], v[1], v[2]),
                Vec3::new(v[3], v[4], v[5]),
            )
        })
    }

    #[test]
    fn test_cube_sizes() {
        for facing in [Facing::Outward, Facing::Inward] {
            assert_eq!(cube_vertices(facing).len(), 36 * 6);
            assert_eq!(cube_tex_coords(facing).len(), 36 * 2);
        }
    }

    #[test]
    fn test_outward_normals_point_away() {
        assert!(vertices(&cube_vertices(Facing::Outward)).all(|(p, n)| n.dot(p) > 0.0));
    }

    #[test]
    fn test_inward_normals_point_in() {
        assert!(vertices(&cube_vertices(Facing::Inward)).all(|(p, n)| n.dot(p) < 0.0));
    }

    #[test]
    fn test_vertices_on_unit_cube() {
        for (p, n) in vertices(&cube_vertices(Facing::Outward)) {
            assert!([p.x, p.y, p.z].iter().all(|c| c.abs() == 1.0));
            assert_eq!(n.length(), 1.0);
        }
    }

    #[test]
    fn test_tex_coords_cover_each_face() {
        let uv = cube_tex_coords(Facing::Inward);
        assert!(uv.iter().all(|c| (0.0..=1.0).contains(c)));
        for face in uv.chunks_exact(12) {
            let us: Vec<f32> = face.iter().step_by(2).copied().collect();
            assert!(us.contains(&0.0) && us.contains(&1.0));
        }
    }
}
