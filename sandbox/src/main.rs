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

// Palestra
// A volleyball hall lit by colored spots, explored with a fly camera.

mod config;
mod controls;
mod scene_setup;

use std::time::Instant;

use anyhow::{Context, Result};
use palestra_core::math::Vec4;
use palestra_core::platform::window::PalestraWindow;
use palestra_core::renderer::{CommandRecorder, RenderError, RenderSystem};
use palestra_data::Scene;
use palestra_infra::{
    translate_winit_input, InputEvent, InputState, Key, WgpuRenderSystem, WinitWindow,
    WinitWindowBuilder,
};
use palestra_lanes::asset_lane::{ModelBuilder, ResourceLocator};
use palestra_lanes::render_lane::{LitInstanceLane, RenderLane};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

use crate::config::AppConfig;
use crate::controls::FlyControls;

const CLEAR_COLOR: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

fn aspect_ratio((width, height): (u32, u32)) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// Application state driven by the `winit` event loop.
struct PalestraApp {
    config: AppConfig,
    locator: ResourceLocator,
    controls: FlyControls,
    lane: LitInstanceLane,
    input: InputState,
    window: Option<WinitWindow>,
    renderer: Option<Box<dyn RenderSystem>>,
    scene: Option<Scene>,
    last_update: Instant,
    /// Set when startup fails; returned from `main` once the loop exits.
    fatal: Option<anyhow::Error>,
}

impl PalestraApp {
    fn new(config: AppConfig, locator: ResourceLocator) -> Self {
        Self {
            controls: FlyControls::new(config.controls.clone()),
            config,
            locator,
            lane: LitInstanceLane::new(),
            input: InputState::default(),
            window: None,
            renderer: None,
            scene: None,
            last_update: Instant::now(),
            fatal: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = WinitWindowBuilder::new()
            .with_title(self.config.window.title.clone())
            .with_dimensions(self.config.window.width, self.config.window.height)
            .build(event_loop)
            .context("Failed to create the window")?;

        let mut renderer: Box<dyn RenderSystem> = Box::new(WgpuRenderSystem::new());
        renderer
            .init(&window)
            .context("Failed to initialize the renderer")?;

        let builder = ModelBuilder::new(renderer.graphics_device()?, self.locator.clone());
        let camera = self.config.camera.build(aspect_ratio(window.inner_size()));
        let scene = scene_setup::load_scene(&builder, camera).context("Failed to load the scene")?;

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.scene = Some(scene);
        self.last_update = Instant::now();
        Ok(())
    }

    fn frame(&mut self) {
        let (Some(renderer), Some(scene)) = (self.renderer.as_mut(), self.scene.as_mut()) else {
            return;
        };

        let now = Instant::now();
        let seconds = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;
        self.controls
            .update(scene.camera_mut(), &mut self.input, seconds);

        let lane = &self.lane;
        let params = &self.config.render;
        let mut record = |recorder: &mut dyn CommandRecorder| lane.render(scene, params, recorder);
        match renderer.render(CLEAR_COLOR, &mut record) {
            Ok(stats) => log::trace!(
                "Frame {} rendered: {} draw calls, {} triangles.",
                stats.frame_number,
                stats.draw_calls,
                stats.triangles_rendered
            ),
            Err(e @ RenderError::SurfaceAcquisitionFailed(_)) => log::warn!("Frame skipped: {e}"),
            Err(e) => log::error!("Rendering error: {e}"),
        }
    }
}

impl Drop for PalestraApp {
    fn drop(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.shutdown();
        }
    }
}

impl ApplicationHandler for PalestraApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.fatal.is_some() {
            return;
        }
        log::info!("Application resumed. Initializing window and renderer...");
        if let Err(e) = self.initialize(event_loop) {
            log::error!("{e:#}");
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().is_none_or(|w| w.winit().id() != id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Shutdown requested, exiting event loop...");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
                if let Some(scene) = self.scene.as_mut().filter(|_| size.height > 0) {
                    scene
                        .camera_mut()
                        .set_viewport_aspect_ratio(aspect_ratio((size.width, size.height)));
                }
            }
            WindowEvent::Focused(false) => self.input.release_all(),
            WindowEvent::RedrawRequested => self.frame(),
            other => {
                if let Some(input_event) = translate_winit_input(&other) {
                    if input_event == (InputEvent::KeyPressed { key: Key::Escape }) {
                        log::info!("Escape pressed, exiting event loop...");
                        event_loop.exit();
                    }
                    self.input.apply(&input_event);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .init();

    let default_locator =
        ResourceLocator::beside_executable().context("Failed to locate the executable")?;
    let config = AppConfig::load_from(&AppConfig::locate(default_locator.root()))?;
    let locator = config
        .resources_dir
        .clone()
        .map_or(default_locator, ResourceLocator::new);
    log::info!("Reading resources from {}", locator.root().display());

    let event_loop = EventLoop::new()?;
    let mut app = PalestraApp::new(config, locator);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
