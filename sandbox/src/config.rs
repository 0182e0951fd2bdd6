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

//! Startup configuration, read from `palestra.ron`.
//!
//! Every field has a default, so the file may be missing entirely or list
//! only the values it changes.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use palestra_core::math::Vec3;
use palestra_core::renderer::RenderParams;
use palestra_data::scene::Camera;
use serde::{Deserialize, Serialize};

/// Name of the configuration file inside the resources directory.
pub const CONFIG_FILE: &str = "palestra.ron";
/// Environment variable that points at a configuration file elsewhere.
pub const CONFIG_ENV: &str = "PALESTRA_CONFIG";

/// Window creation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Palestra".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Where the viewer starts and what the lens looks like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Vertical field of view, in degrees.
    pub field_of_view: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    /// Initial downward tilt, in degrees.
    pub initial_pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 13.0, 25.0),
            field_of_view: 90.0,
            near_plane: 0.1,
            far_plane: 200.0,
            initial_pitch: 30.0,
        }
    }
}

impl CameraConfig {
    /// A camera in the configured start pose.
    pub fn build(&self, aspect_ratio: f32) -> Camera {
        let mut camera = Camera::default();
        camera.set_position(self.position);
        camera.set_near_and_far_planes(self.near_plane, self.far_plane);
        camera.set_field_of_view(self.field_of_view);
        camera.offset_orientation(self.initial_pitch, 0.0);
        camera.set_viewport_aspect_ratio(aspect_ratio);
        camera
    }
}

/// Fly-camera speeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Units per second.
    pub move_speed: f32,
    /// Degrees per second, left/right arrows.
    pub horizontal_turn_speed: f32,
    /// Degrees per second, up/down arrows.
    pub vertical_turn_speed: f32,
    /// Field-of-view change per wheel notch, in degrees.
    pub zoom_sensitivity: f32,
    pub min_field_of_view: f32,
    pub max_field_of_view: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            horizontal_turn_speed: 90.0,
            vertical_turn_speed: 40.0,
            zoom_sensitivity: -2.0,
            min_field_of_view: 5.0,
            max_field_of_view: 130.0,
        }
    }
}

/// Everything the application reads at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    /// Overrides the `resources` directory next to the executable.
    pub resources_dir: Option<PathBuf>,
    pub render: RenderParams,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
}

impl AppConfig {
    /// Parses and validates a RON document.
    pub fn from_ron(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text).context("Malformed configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the camera and controls cannot work with.
    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        ensure!(
            is_field_of_view(camera.field_of_view),
            "camera.field_of_view must lie in (0, 180), got {}",
            camera.field_of_view
        );
        ensure!(
            camera.near_plane > 0.0,
            "camera.near_plane must be positive, got {}",
            camera.near_plane
        );
        ensure!(
            camera.far_plane > camera.near_plane,
            "camera.far_plane ({}) must be beyond camera.near_plane ({})",
            camera.far_plane,
            camera.near_plane
        );

        let controls = &self.controls;
        ensure!(
            is_field_of_view(controls.min_field_of_view)
                && is_field_of_view(controls.max_field_of_view),
            "controls field of view bounds must lie in (0, 180), got {}..{}",
            controls.min_field_of_view,
            controls.max_field_of_view
        );
        ensure!(
            controls.min_field_of_view <= controls.max_field_of_view,
            "controls.min_field_of_view ({}) exceeds controls.max_field_of_view ({})",
            controls.min_field_of_view,
            controls.max_field_of_view
        );
        Ok(())
    }

    /// Reads `path`. A missing file yields the defaults; anything else that
    /// goes wrong is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_ron(&text)
                    .with_context(|| format!("Invalid configuration file {}", path.display()))?;
                log::info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    /// The configuration file to read: `$PALESTRA_CONFIG` if set, otherwise
    /// `palestra.ron` in `resources_dir`.
    pub fn locate(resources_dir: &Path) -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| resources_dir.join(CONFIG_FILE))
    }

    /// Serializes the configuration, e.g. to write a starting file.
    pub fn to_ron(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty).context("Failed to serialize configuration")
    }
}

fn is_field_of_view(degrees: f32) -> bool {
    degrees > 0.0 && degrees < 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use palestra_core::renderer::{FilterMode, FogEquation};

    #[test]
    fn test_defaults_match_the_demo() {
        let config = AppConfig::default();
        assert_eq!(config.window.title, "Palestra");
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert_eq!(config.camera.position, Vec3::new(0.0, 13.0, 25.0));
        assert_eq!(config.controls.zoom_sensitivity, -2.0);
        assert!(config.render.fog.is_none());
        assert!(config.resources_dir.is_none());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = AppConfig::from_ron(
            "(window: (title: \"Hall\"), render: (min_filter: Nearest, fog: Some((equation: ExponentialSquared))), controls: (move_speed: 12.0))",
        )
        .unwrap();
        assert_eq!(config.window.title, "Hall");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.render.min_filter, FilterMode::Nearest);
        assert_eq!(config.render.fog.unwrap().equation, FogEquation::ExponentialSquared);
        assert_eq!(config.controls.move_speed, 12.0);
        assert_eq!(config.controls.vertical_turn_speed, 40.0);
    }

    #[test]
    fn test_round_trip_through_ron() {
        let mut config = AppConfig::default();
        config.resources_dir = Some(PathBuf::from("/opt/palestra/resources"));
        config.camera.field_of_view = 70.0;
        let text = config.to_ron().unwrap();
        assert_eq!(AppConfig::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "(window: (width: \"wide\"))").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_camera_config_builds_start_pose() {
        let camera = CameraConfig::default().build(4.0 / 3.0);
        assert_eq!(camera.position(), Vec3::new(0.0, 13.0, 25.0));
        assert_relative_eq!(camera.vertical_angle(), 30.0);
        assert_relative_eq!(camera.field_of_view(), 90.0);
        assert_relative_eq!(camera.near_plane(), 0.1);
        assert_relative_eq!(camera.far_plane(), 200.0);
    }

    #[test]
    fn test_out_of_range_camera_is_rejected() {
        for doc in [
            "(camera: (field_of_view: 0.0))",
            "(camera: (field_of_view: 180.0))",
            "(camera: (near_plane: 0.0))",
            "(camera: (near_plane: 10.0, far_plane: 10.0))",
        ] {
            assert!(AppConfig::from_ron(doc).is_err(), "{doc} was accepted");
        }
    }

    #[test]
    fn test_inverted_zoom_bounds_are_rejected() {
        let doc = "(controls: (min_field_of_view: 130.0, max_field_of_view: 5.0))";
        assert!(AppConfig::from_ron(doc).is_err());
        assert!(AppConfig::from_ron("(controls: (max_field_of_view: 200.0))").is_err());
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "(camera: (field_of_view: 0.0))").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("field_of_view"));
    }
}
