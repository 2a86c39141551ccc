use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use px_camera::{Camera, CameraConfig, OrbitController, PointerButton};
use px_core::Vector3;

use crate::state::SceneState;

/// Frames per simulated second of animation.
const FRAME_RATE: f64 = 60.0;
/// Height of the bound orbit path above the ground plane.
const PATH_HEIGHT: f64 = 3.0;

#[derive(Debug, Default)]
pub struct RunSummary {
    pub frames: u32,
    pub visible_per_frame: Vec<usize>,
    pub picked: Option<(String, f64)>,
}

impl RunSummary {
    pub fn average_visible(&self) -> f64 {
        if self.visible_per_frame.is_empty() {
            0.0
        } else {
            self.visible_per_frame.iter().sum::<usize>() as f64 / self.visible_per_frame.len() as f64
        }
    }
}

pub struct App {
    pub camera: Camera,
    pub controller: OrbitController,
    pub scene: SceneState,
    pub width: f64,
    pub height: f64,
}

impl App {
    pub fn new(config_path: Option<&Path>, width: u32, height: u32) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => CameraConfig::load(path)
                .with_context(|| format!("failed to load camera config from {}", path.display()))?,
            None => CameraConfig::default(),
        };

        let width = width.max(1) as f64;
        let height = height.max(1) as f64;

        let mut camera = Camera::new(config.camera);
        camera.set_aspect(width / height);

        let scene = SceneState::demo();
        if let Some(bounds) = scene.bounds() {
            camera.fit_bounds(&bounds);
        }
        log::debug!("initial camera: {camera:?}");

        Ok(Self {
            camera,
            controller: OrbitController::new(config.controller),
            scene,
            width,
            height,
        })
    }

    /// Animates the camera for `frames` ticks, then hands it to the pointer
    /// controller and picks at the viewport center.
    pub fn run(&mut self, frames: u32, radius: f64) -> RunSummary {
        let mut summary = RunSummary::default();

        let clock = Rc::clone(&self.scene.clock);
        self.camera.bind_position(move || {
            let t = clock.get();
            (radius * t.cos(), PATH_HEIGHT, radius * t.sin())
        });
        self.camera.bind_look_at(|| Vector3::ZERO);

        for frame in 0..frames {
            self.scene.clock.set(frame as f64 / FRAME_RATE);
            self.camera.refresh_bindings();

            let visible = self.render_frame();
            log::trace!("frame {frame}: {visible} objects visible");
            summary.visible_per_frame.push(visible);
            summary.frames += 1;
        }

        self.camera.unbind_position();
        self.camera.unbind_look_at();
        self.simulate_pointer();

        let ray = self
            .controller
            .pick(self.width / 2.0, self.height / 2.0, self.width, self.height, &mut self.camera);
        summary.picked = self
            .scene
            .pick(&ray)
            .map(|(object, t)| (object.name.clone(), t));
        log::info!("pick ray {ray:?} hit {:?}", summary.picked);

        summary
    }

    /// Projects every object's corners the way a rasterizer would and counts
    /// the objects with at least one corner on screen.
    fn render_frame(&mut self) -> usize {
        let view_projection = self.camera.view_projection_matrix();
        let (width, height) = (self.width, self.height);

        self.scene
            .objects
            .iter()
            .filter(|object| {
                object.bounds.corners().iter().any(|&corner| {
                    if !self.camera.is_point_in_front(corner) {
                        return false;
                    }
                    let [x, y, _, w] =
                        view_projection.transform_homogeneous([corner.x, corner.y, corner.z, 1.0]);
                    let px = (x / w + 1.0) * 0.5 * width;
                    let py = (1.0 - y / w) * 0.5 * height;
                    (0.0..=width).contains(&px) && (0.0..=height).contains(&py)
                })
            })
            .count()
    }

    /// A short drag orbits, a wheel notch zooms in.
    fn simulate_pointer(&mut self) {
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        self.controller.press(PointerButton::Primary, cx, cy);
        self.controller.pointer_moved(cx + 40.0, cy - 10.0, &mut self.camera);
        self.controller.release(PointerButton::Primary);
        self.controller.wheel(1.0, &mut self.camera);
        log::debug!(
            "after pointer input: position {:?}, distance {:.3}",
            self.camera.position(),
            self.camera.position().distance_to(self.camera.target())
        );
    }
}
