//! Pointer input adapter: drags orbit or pan the camera, the wheel zooms,
//! and clicks become pick rays.

use px_core::{Error, Ray, Result};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;

/// Pointer button driving a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Orbits around the target.
    Primary,
    /// Pans in the view plane.
    Secondary,
    /// Pans in the view plane.
    Middle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Sensitivities for [`OrbitController`].
pub struct ControllerOptions {
    /// Radians of orbit per pixel of drag.
    pub rotate_speed: f64,
    /// View-plane travel per pixel of drag, as a fraction of the distance to
    /// the target.
    pub pan_speed: f64,
    /// Zoom factor step per wheel notch: `zoom(1 - speed)` in,
    /// `zoom(1 + speed)` out.
    pub zoom_speed: f64,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            pan_speed: 0.002,
            zoom_speed: 0.1,
        }
    }
}

impl ControllerOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.rotate_speed.is_finite() || !self.pan_speed.is_finite() {
            return Err(Error::InvalidConfig("controller speeds must be finite".to_string()));
        }
        if !(0.0..1.0).contains(&self.zoom_speed) {
            return Err(Error::InvalidConfig(format!(
                "zoom_speed must be in [0, 1), got {}",
                self.zoom_speed
            )));
        }
        Ok(())
    }
}

/// Tracks pointer state between events and turns it into camera moves.
///
/// The controller holds no camera; every call takes the one to drive.
#[derive(Debug, Default)]
pub struct OrbitController {
    pub options: ControllerOptions,
    active_button: Option<PointerButton>,
    last_pointer: Option<(f64, f64)>,
}

impl OrbitController {
    pub fn new(options: ControllerOptions) -> Self {
        Self {
            options,
            active_button: None,
            last_pointer: None,
        }
    }

    pub fn active_button(&self) -> Option<PointerButton> {
        self.active_button
    }

    pub fn press(&mut self, button: PointerButton, x: f64, y: f64) {
        self.active_button = Some(button);
        self.last_pointer = Some((x, y));
    }

    pub fn release(&mut self, button: PointerButton) {
        if self.active_button == Some(button) {
            self.active_button = None;
            self.last_pointer = None;
        }
    }

    /// Applies the drag since the previous pointer position, if a button is
    /// held. Returns whether the camera moved.
    pub fn pointer_moved(&mut self, x: f64, y: f64, camera: &mut Camera) -> bool {
        let Some(button) = self.active_button else {
            self.last_pointer = Some((x, y));
            return false;
        };
        let Some((last_x, last_y)) = self.last_pointer.replace((x, y)) else {
            return false;
        };
        let (dx, dy) = (x - last_x, y - last_y);
        if dx == 0.0 && dy == 0.0 {
            return false;
        }

        match button {
            PointerButton::Primary => {
                camera.orbit(dx * self.options.rotate_speed, dy * self.options.rotate_speed);
            }
            PointerButton::Secondary | PointerButton::Middle => {
                // Grab semantics: the scene follows the pointer.
                let scale = self.options.pan_speed * camera.position().distance_to(camera.target());
                camera.pan(-dx * scale, dy * scale);
            }
        }
        true
    }

    /// Positive `delta` (wheel away from the user) zooms in.
    pub fn wheel(&mut self, delta: f64, camera: &mut Camera) -> bool {
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }
        let factor = if delta > 0.0 {
            1.0 - self.options.zoom_speed
        } else {
            1.0 + self.options.zoom_speed
        };
        camera.zoom(factor);
        true
    }

    /// Pick ray through a pixel of a `width` x `height` viewport.
    pub fn pick(&self, x: f64, y: f64, width: f64, height: f64, camera: &mut Camera) -> Ray {
        camera.pixel_to_ray(x, y, width, height)
    }
}
