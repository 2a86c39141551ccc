//! Value types for the camera math kernel: vectors, homogeneous matrices,
//! rays and bounding boxes.

pub mod bounding_box;
pub mod error;
pub mod matrix4;
pub mod ray;
pub mod vector3;

mod tests;

pub use bounding_box::BoundingBox;
pub use error::{Error, Result};
pub use matrix4::Matrix4;
pub use ray::Ray;
pub use vector3::Vector3;
