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

mod common;

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use common::{RecordingDevice, TextureRecord, BROKEN_SHADER};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use palestra_core::math::{Vec3, Vec4};
use palestra_core::renderer::{FilterMode, PixelFormat, WrapMode};
use palestra_lanes::asset_lane::{
    cube_tex_coords, BuildError, Facing, ModelBuilder, ResourceLocator, CUBE_VERTEX_COUNT,
};
use palestra_lanes::render_lane::{SCENE_FRAGMENT_SHADER, SCENE_VERTEX_SHADER};
use tempfile::TempDir;

const VS: &str = SCENE_VERTEX_SHADER;
const FS: &str = SCENE_FRAGMENT_SHADER;

const BALL_OBJ: &str = "\
mtllib ball.mtl
o top
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
usemtl leather
f 1 2 3 4
o bottom
v 0 0 -1
v 1 0 -1
v 0 1 -1
f 5 6 7
";

const BALL_MTL: &str = "\
newmtl leather
Ka 0.2 0.2 0.2
Kd 0.9 0.8 0.1
Ks 0.3 0.3 0.3
Ns 0
";

struct Fixture {
    _dir: TempDir,
    device: Arc<RecordingDevice>,
    builder: ModelBuilder,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, body: &[u8]| std::fs::write(dir.path().join(name), body).unwrap();
    write(VS, b"// vertex");
    write(FS, b"// fragment");
    write("Volleyball.obj", BALL_OBJ.as_bytes());
    write("ball.mtl", BALL_MTL.as_bytes());
    write("broken.frag.wgsl", BROKEN_SHADER.as_bytes());
    write("notes.txt", b"nothing to see");

    // Top row red, bottom row blue, so the upload order is observable.
    let mut img = RgbImage::new(4, 2);
    for x in 0..4 {
        img.put_pixel(x, 0, Rgb([255, 0, 0]));
        img.put_pixel(x, 1, Rgb([0, 0, 255]));
    }
    DynamicImage::ImageRgb8(img)
        .save_with_format(dir.path().join("wall.png"), ImageFormat::Png)
        .unwrap();

    let device = Arc::new(RecordingDevice::default());
    let builder = ModelBuilder::new(device.clone(), ResourceLocator::new(dir.path()));
    Fixture {
        _dir: dir,
        device,
        builder,
    }
}

#[test]
fn test_cube_has_36_vertices_and_bound_attributes() {
    let f = fixture();
    let asset = f
        .builder
        .build_cube(VS, FS, Vec4::new(0.2, 0.2, 0.2, 1.0))
        .unwrap();

    assert_eq!(asset.meshes().len(), 1);
    let mesh = &asset.meshes()[0];
    assert_eq!(mesh.draw_count, CUBE_VERTEX_COUNT);
    assert_eq!(mesh.draw_start, 0);
    assert_eq!(mesh.diffuse_color, Vec4::new(0.2, 0.2, 0.2, 1.0));
    assert_eq!(mesh.ambient_color, Vec4::ONE);
    assert_eq!(f.device.buffer(mesh.vertex_buffer).len(), 36 * 6);

    let bindings = f.device.bindings(mesh.vertex_array);
    let locations: Vec<(u32, u32)> = bindings.iter().map(|(_, a)| (a.location, a.offset)).collect();
    assert_eq!(locations, vec![(0, 0), (1, 3)]);
    assert!(bindings.iter().all(|(b, a)| *b == mesh.vertex_buffer && a.stride == 6));
}

#[test]
fn test_inward_cube_normals_face_center() {
    let f = fixture();
    let asset = f.builder.build_cube_inward(VS, FS, Vec4::ONE).unwrap();
    let data = f.device.buffer(asset.meshes()[0].vertex_buffer);
    for v in data.chunks_exact(6) {
        let p = Vec3::new(v[0], v[1], v[2]);
        let n = Vec3::new(v[3], v[4], v[5]);
        assert!(p.dot(n) < 0.0);
        assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn test_import_creates_one_mesh_per_sub_mesh() {
    let f = fixture();
    let asset = f.builder.import_model("Volleyball.obj", VS, FS).unwrap();

    assert_eq!(asset.meshes().len(), 2);
    let [top, bottom] = [&asset.meshes()[0], &asset.meshes()[1]];
    assert_eq!(top.draw_count, 6);
    assert_eq!(bottom.draw_count, 3);
    assert_ne!(top.program, bottom.program);

    assert_abs_diff_eq!(top.diffuse_color, Vec4::new(0.9, 0.8, 0.1, 1.0));
    assert_abs_diff_eq!(top.ambient_color, Vec4::new(0.2, 0.2, 0.2, 1.0));
    // `Ns 0` leaves the default shininess.
    assert_eq!(top.shininess, 1.0);
}

#[test]
fn test_import_failure_yields_empty_asset() {
    let f = fixture();
    assert!(f
        .builder
        .import_model("missing.obj", VS, FS)
        .unwrap()
        .is_empty());
    assert!(f
        .builder
        .import_model("notes.txt", VS, FS)
        .unwrap()
        .is_empty());
    assert_eq!(f.device.program_count(), 0);
}

#[test]
fn test_shader_failures_are_fatal() {
    let f = fixture();
    assert!(matches!(
        f.builder.build_cube(VS, "missing.frag.wgsl", Vec4::ONE),
        Err(BuildError::Shader { .. })
    ));
    assert!(matches!(
        f.builder.build_cube(VS, "broken.frag.wgsl", Vec4::ONE),
        Err(BuildError::Shader { .. })
    ));
    assert!(matches!(
        f.builder.import_model("Volleyball.obj", VS, "broken.frag.wgsl"),
        Err(BuildError::Shader { .. })
    ));
}

#[test]
fn test_add_texture_uploads_flipped_mip_chain_and_uvs() {
    let f = fixture();
    let mut asset = f.builder.build_cube_inward(VS, FS, Vec4::ONE).unwrap();
    let uv = cube_tex_coords(Facing::Inward);
    f.builder
        .add_texture(&mut asset, 0, "wall.png", &uv, FilterMode::Linear, WrapMode::ClampToEdge)
        .unwrap();

    let mesh = &asset.meshes()[0];
    assert_eq!(mesh.textures.len(), 1);
    let texture = mesh.textures[0];
    assert_eq!((texture.original_width, texture.original_height), (4.0, 2.0));

    match f.device.texture(texture.id) {
        TextureRecord::Flat {
            format,
            filter,
            wrap,
            levels,
            first_row,
            ..
        } => {
            assert_eq!(format, PixelFormat::Rgb);
            assert_eq!(filter, FilterMode::Linear);
            assert_eq!(wrap, WrapMode::ClampToEdge);
            assert_eq!(levels, vec![(4, 2), (2, 1), (1, 1)]);
            // The bottom (blue) row is uploaded first.
            assert_eq!(&first_row[..3], &[0, 0, 255]);
        }
        other => panic!("expected a 2D texture, got {other:?}"),
    }

    let uv_buffer = mesh.tex_coord_buffer.unwrap();
    assert_eq!(f.device.buffer(uv_buffer), uv);
    let bindings = f.device.bindings(mesh.vertex_array);
    assert!(bindings
        .iter()
        .any(|(b, a)| *b == uv_buffer && a.location == 2 && a.components == 2));
}

#[test]
fn test_add_texture_rejects_wrong_uv_count() {
    let f = fixture();
    let mut asset = f.builder.build_cube(VS, FS, Vec4::ONE).unwrap();
    let err = f
        .builder
        .add_texture(&mut asset, 0, "wall.png", &[0.0; 10], FilterMode::Linear, WrapMode::Repeat)
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::UvCountMismatch {
            expected: 72,
            actual: 10
        }
    ));
    assert!(asset.meshes()[0].textures.is_empty());
}

#[test]
fn test_add_texture_errors() {
    let f = fixture();
    let mut asset = f.builder.build_cube(VS, FS, Vec4::ONE).unwrap();
    let uv = cube_tex_coords(Facing::Outward);
    assert!(matches!(
        f.builder
            .add_texture(&mut asset, 0, "missing.png", &uv, FilterMode::Linear, WrapMode::Repeat),
        Err(BuildError::Texture { .. })
    ));
    assert!(matches!(
        f.builder
            .add_texture(&mut asset, 1, "wall.png", &uv, FilterMode::Linear, WrapMode::Repeat),
        Err(BuildError::Scene(_))
    ));
}

#[test]
fn test_swap_round_trip_on_built_asset() {
    let f = fixture();
    let mut asset = f.builder.build_cube(VS, FS, Vec4::ONE).unwrap();
    let uv = cube_tex_coords(Facing::Outward);
    for _ in 0..3 {
        f.builder
            .add_texture(&mut asset, 0, "wall.png", &uv, FilterMode::Linear, WrapMode::Repeat)
            .unwrap();
    }
    let ids = |asset: &palestra_data::assets::ModelAsset| -> Vec<_> {
        asset.meshes()[0].textures.iter().map(|t| t.id).collect()
    };
    let original = ids(&asset);

    asset.save_texture_to_swap(1).unwrap();
    assert_eq!(ids(&asset), vec![original[0], original[2]]);
    asset.flush_swap();
    assert_eq!(ids(&asset), original);
}

#[test]
fn test_cube_map_placeholder() {
    let f = fixture();
    let texture = f.builder.cube_map_placeholder().unwrap();
    assert_eq!(texture.original_width, 64.0);
    assert_eq!(
        f.device.texture(texture.id),
        TextureRecord::Cube {
            size: 64,
            format: PixelFormat::Rgb,
            wrap: WrapMode::Repeat,
        }
    );
}
