use std::path::Path;

use px_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::controller::ControllerOptions;

/// Camera projection mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Construction options for a [`crate::Camera`].
///
/// Missing fields take the defaults below. Out-of-range values are clamped by
/// the camera setters, not rejected here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fov: f64,
    /// Near clipping plane distance.
    pub near: f64,
    /// Far clipping plane distance.
    pub far: f64,
    /// Viewport aspect ratio (width / height).
    pub aspect: f64,
    pub projection: Projection,
    /// Eye position in world space.
    pub position: [f64; 3],
    /// Look-at target in world space.
    pub look_at: [f64; 3],
    pub up: [f64; 3],
    // Orthographic view volume, in view space.
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fov: 60.0,
            near: 0.1,
            far: 1000.0,
            aspect: 1.0,
            projection: Projection::Perspective,
            position: [0.0, 0.0, 10.0],
            look_at: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
        }
    }
}

impl CameraOptions {
    /// Rejects NaN and infinities, which clamping cannot repair.
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("fov", self.fov),
            ("near", self.near),
            ("far", self.far),
            ("aspect", self.aspect),
            ("left", self.left),
            ("right", self.right),
            ("bottom", self.bottom),
            ("top", self.top),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(Error::InvalidConfig(format!("{name} must be finite, got {value}")));
            }
        }

        let vectors = [("position", self.position), ("look_at", self.look_at), ("up", self.up)];
        for (name, value) in vectors {
            if value.iter().any(|v| !v.is_finite()) {
                return Err(Error::InvalidConfig(format!("{name} must be finite, got {value:?}")));
            }
        }
        Ok(())
    }
}

/// Camera options plus pointer-controller tuning, as stored in a TOML file.
///
/// ```toml
/// fov = 45.0
/// position = [0.0, 2.0, 8.0]
/// projection = "perspective"
///
/// [controller]
/// rotate_speed = 0.01
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(flatten)]
    pub camera: CameraOptions,
    #[serde(default)]
    pub controller: ControllerOptions,
}

impl CameraConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.camera.validate()?;
        config.controller.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        log::debug!("loading camera config from {}", path.display());
        Self::from_toml_str(&source)
    }
}
