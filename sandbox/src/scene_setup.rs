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

//! The volleyball hall: which assets exist and where their instances go.

use palestra_core::math::{degrees_to_radians, Mat4, Vec3, Vec4};
use palestra_core::renderer::{FilterMode, WrapMode};
use palestra_data::assets::ModelAsset;
use palestra_data::scene::{AssetHandle, Camera, ModelInstance};
use palestra_data::Scene;
use palestra_lanes::asset_lane::{cube_tex_coords, BuildError, Facing, ModelBuilder};
use palestra_lanes::render_lane::{SCENE_FRAGMENT_SHADER as FS, SCENE_VERTEX_SHADER as VS};

/// The shared assets instances are placed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prop {
    /// Inward cube with `wall.jpg`.
    Hall,
    /// Flat cube with `court_mat.png`.
    Court,
    /// Plain white cube: columns, cables and the net.
    Cuboid,
    /// `Volleyball.obj`, scaled down to court size.
    Ball,
    /// `spotlight.obj`, hung from the ceiling.
    Spot,
    /// `bench.obj`, along the side wall.
    Bench,
}

impl Prop {
    const ALL: [Prop; 6] = [
        Prop::Hall,
        Prop::Court,
        Prop::Cuboid,
        Prop::Ball,
        Prop::Spot,
        Prop::Bench,
    ];
}

fn translate(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

fn scale(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(x, y, z))
}

fn rotate_y(degrees: f32) -> Mat4 {
    Mat4::from_rotation_y(degrees_to_radians(degrees))
}

/// Every instance of the hall, in draw order.
pub fn placements() -> Vec<(Prop, Mat4)> {
    const CEILING: f32 = 69.0;
    const SPOT_Z: f32 = 47.0;

    let mut out = vec![
        (Prop::Hall, translate(0.0, 33.0, 0.0) * scale(72.0, 40.0, 72.0)),
        (Prop::Court, translate(0.0, -6.5, 0.0) * scale(18.0, 0.1, 36.0)),
        (Prop::Cuboid, translate(12.0, 0.0, 0.0) * scale(0.4, 6.5, 0.4)),
        (Prop::Cuboid, translate(-12.0, 0.0, 0.0) * scale(0.4, 6.5, 0.4)),
    ];
    for (x, y) in [(-10.0, 2.5), (-10.0, 5.9), (10.0, 2.5), (10.0, 5.9)] {
        out.push((Prop::Cuboid, translate(x, y, 0.0) * scale(2.0, 0.1, 0.1)));
    }
    out.push((Prop::Cuboid, translate(0.0, 4.2, 0.0) * scale(10.0, 2.0, 0.1)));
    for (x, z) in [(-7.0, 10.0), (-5.0, -13.0), (5.0, -10.0), (-1.0, 7.0)] {
        out.push((Prop::Ball, translate(x, -6.5, z) * scale(0.2, 0.2, 0.2)));
    }
    for (x, z, angle) in [
        (-60.0, SPOT_Z, 45.0),
        (68.0, SPOT_Z, 135.0),
        (68.0, -SPOT_Z, -135.0),
        (-60.0, -SPOT_Z, -45.0),
    ] {
        out.push((Prop::Spot, translate(x, CEILING, z) * rotate_y(angle)));
    }
    for z in [-16.0, 16.0] {
        out.push((Prop::Bench, translate(-45.0, -5.3, z) * scale(6.0, 5.0, 10.0)));
    }
    out
}

fn build_prop(builder: &ModelBuilder, prop: Prop) -> Result<ModelAsset, BuildError> {
    let white = Vec4::ONE;
    match prop {
        Prop::Hall => {
            let mut hall = builder.build_cube_inward(VS, FS, white)?;
            builder.add_texture(
                &mut hall,
                0,
                "wall.jpg",
                &cube_tex_coords(Facing::Inward),
                FilterMode::Linear,
                WrapMode::ClampToEdge,
            )?;
            Ok(hall)
        }
        Prop::Court => {
            let mut court = builder.build_cube(VS, FS, white)?;
            builder.add_texture(
                &mut court,
                0,
                "court_mat.png",
                &cube_tex_coords(Facing::Outward),
                FilterMode::Linear,
                WrapMode::ClampToEdge,
            )?;
            Ok(court)
        }
        Prop::Cuboid => builder.build_cube(VS, FS, white),
        Prop::Ball => builder.import_model("Volleyball.obj", VS, FS),
        Prop::Spot => builder.import_model("spotlight.obj", VS, FS),
        Prop::Bench => builder.import_model("bench.obj", VS, FS),
    }
}

/// Builds every asset and places every instance under the default lights.
pub fn load_scene(builder: &ModelBuilder, camera: Camera) -> Result<Scene, BuildError> {
    let mut scene = Scene::new(camera);

    let mut handles: Vec<(Prop, AssetHandle)> = Vec::with_capacity(Prop::ALL.len());
    for prop in Prop::ALL {
        let asset = build_prop(builder, prop)?;
        log::debug!("{prop:?}: {} meshes", asset.meshes().len());
        handles.push((prop, scene.add_asset(asset)));
    }

    for (prop, transform) in placements() {
        let Some(&(_, handle)) = handles.iter().find(|(p, _)| *p == prop) else {
            continue;
        };
        scene.add_instance(ModelInstance::new(handle, transform))?;
    }
    log::info!(
        "Scene loaded: {} assets, {} instances",
        handles.len(),
        scene.instances().len()
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn count(prop: Prop) -> usize {
        placements().iter().filter(|(p, _)| *p == prop).count()
    }

    #[test]
    fn test_instance_counts() {
        assert_eq!(placements().len(), 19);
        assert_eq!(count(Prop::Hall), 1);
        assert_eq!(count(Prop::Court), 1);
        assert_eq!(count(Prop::Cuboid), 7);
        assert_eq!(count(Prop::Ball), 4);
        assert_eq!(count(Prop::Spot), 4);
        assert_eq!(count(Prop::Bench), 2);
    }

    #[test]
    fn test_hall_encloses_the_court() {
        let all = placements();
        let hall = all[0].1;
        assert_abs_diff_eq!(
            hall.transform_point3(Vec3::ZERO),
            Vec3::new(0.0, 33.0, 0.0),
            epsilon = 1e-5
        );
        assert_abs_diff_eq!(
            hall.transform_point3(Vec3::new(1.0, -1.0, 1.0)),
            Vec3::new(72.0, -7.0, 72.0),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_column_scales_before_translating() {
        let all = placements();
        let (prop, column) = all[2];
        assert_eq!(prop, Prop::Cuboid);
        assert_abs_diff_eq!(
            column.transform_point3(Vec3::ONE),
            Vec3::new(12.4, 6.5, 0.4),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_spots_hang_from_the_ceiling() {
        for (_, transform) in placements().into_iter().filter(|(p, _)| *p == Prop::Spot) {
            let origin = transform.transform_point3(Vec3::ZERO);
            assert_abs_diff_eq!(origin.y, 69.0, epsilon = 1e-5);
            // Rotation keeps lengths.
            let x = transform.transform_vector3(Vec3::X);
            assert_abs_diff_eq!(x.length(), 1.0, epsilon = 1e-5);
        }
    }
}
