use px_core::Matrix4;

use crate::camera::Camera;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
/// Per-frame camera snapshot in the layout a vertex shader reads.
pub struct CameraUniform {
    /// Column-major view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub aspect: f32,
    /// Unit vector from the eye towards the target.
    pub forward: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: Matrix4::identity().to_cols_array_2d_f32(),
            position: [0.0; 3],
            aspect: 1.0,
            forward: [0.0, 0.0, -1.0],
            fov: 60.0,
        }
    }
}

impl CameraUniform {
    pub(crate) fn new(view_proj: &Matrix4, camera: &Camera) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d_f32(),
            position: glam::Vec3::from(camera.position()).to_array(),
            aspect: camera.aspect() as f32,
            forward: glam::Vec3::from(camera.forward()).to_array(),
            fov: camera.fov() as f32,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
