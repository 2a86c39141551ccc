//! Camera for the real-time renderer: view/projection matrices with lazy
//! caching, movement, projection and ray casting, per-frame bindings, and a
//! pointer-input adapter.

pub mod cache;
pub mod camera;
pub mod controller;
pub mod options;
pub mod uniform;


pub use cache::MatrixCache;
pub use camera::{Binding, Camera};
pub use controller::{ControllerOptions, OrbitController, PointerButton};
pub use options::{CameraConfig, CameraOptions, Projection};
pub use uniform::CameraUniform;
