use std::ops::Mul;

use crate::error::{Error, Result};
use crate::vector3::Vector3;

/// Smallest span allowed between opposite planes of a projection volume.
const MIN_SPAN: f64 = 1e-9;

/// 4x4 homogeneous matrix, row-major (`m[row][col]`).
///
/// Points are column vectors, so `a * b` applies `b` first. Translation lives
/// in the last column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4 {
    pub m: [[f64; 4]; 4],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix4 {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn zero() -> Self {
        Self { m: [[0.0; 4]; 4] }
    }

    pub fn from_rows(m: [[f64; 4]; 4]) -> Self {
        Self { m }
    }

    pub fn rows(&self) -> [[f64; 4]; 4] {
        self.m
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row][col]
    }

    pub fn translation(offset: Vector3) -> Self {
        let mut result = Self::identity();
        result.m[0][3] = offset.x;
        result.m[1][3] = offset.y;
        result.m[2][3] = offset.z;
        result
    }

    /// Right-handed perspective projection with an OpenGL depth range
    /// (camera looks down -Z, NDC z in [-1, 1]).
    ///
    /// `m[3][3]` is 0: clip-space `w` carries the view depth for the divide.
    pub fn perspective(fov_y_radians: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (fov_y_radians / 2.0).tan();
        let depth = span(near, far);

        let mut result = Self::zero();
        result.m[0][0] = f / aspect;
        result.m[1][1] = f;
        result.m[2][2] = -(far + near) / depth;
        result.m[2][3] = -(2.0 * far * near) / depth;
        result.m[3][2] = -1.0;
        result
    }

    /// Right-handed orthographic projection with an OpenGL depth range.
    ///
    /// `m[3][3]` is 1: there is no perspective divide.
    pub fn orthographic(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Self {
        let width = span(left, right);
        let height = span(bottom, top);
        let depth = span(near, far);

        let mut result = Self::identity();
        result.m[0][0] = 2.0 / width;
        result.m[1][1] = 2.0 / height;
        result.m[2][2] = -2.0 / depth;
        result.m[0][3] = -(right + left) / width;
        result.m[1][3] = -(top + bottom) / height;
        result.m[2][3] = -(far + near) / depth;
        result
    }

    /// View matrix for an eye at `eye` looking at `target`.
    ///
    /// Rows are the basis from [`Matrix4::view_basis`] with translation
    /// `-dot(axis, eye)`, so the result is always finite.
    pub fn look_at(eye: Vector3, target: Vector3, up: Vector3) -> Self {
        let [right, real_up, forward] = Self::view_basis(eye, target, up);

        Self::from_rows([
            [right.x, right.y, right.z, -right.dot(eye)],
            [real_up.x, real_up.y, real_up.z, -real_up.dot(eye)],
            [forward.x, forward.y, forward.z, -forward.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Orthonormal camera basis `[right, up, forward]`, where `forward`
    /// points from the target back towards the eye.
    ///
    /// Degenerate input falls back instead of producing NaN:
    /// - `eye == target`: forward is +Z, i.e. the camera looks down -Z as it
    ///   does by default.
    /// - `up` zero or parallel to forward: `up` is replaced by +Y, then +Z.
    pub fn view_basis(eye: Vector3, target: Vector3, up: Vector3) -> [Vector3; 3] {
        let mut forward = (eye - target).normalize();
        if forward == Vector3::ZERO {
            log::debug!("look_at: eye coincides with target, using +Z as forward");
            forward = Vector3::Z;
        }

        let mut right = up.cross(forward).normalize();
        if right == Vector3::ZERO {
            log::debug!("look_at: up is parallel to forward, picking a fallback up axis");
            right = Vector3::Y.cross(forward).normalize();
            if right == Vector3::ZERO {
                right = Vector3::Z.cross(forward).normalize();
            }
        }
        [right, forward.cross(right), forward]
    }

    pub fn multiply(&self, other: &Self) -> Self {
        let mut result = Self::zero();
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result.m[i][j] += self.m[i][k] * other.m[k][j];
                }
            }
        }
        result
    }

    pub fn transpose(&self) -> Self {
        let mut result = Self::zero();
        for i in 0..4 {
            for j in 0..4 {
                result.m[i][j] = self.m[j][i];
            }
        }
        result
    }

    pub fn determinant(&self) -> f64 {
        Cofactors::new(self).det
    }

    /// General inverse, or `None` when the matrix is singular.
    pub fn try_invert(&self) -> Option<Self> {
        let c = Cofactors::new(self);
        if c.det == 0.0 || !c.det.is_finite() {
            return None;
        }
        let inverse = c.inverse();
        inverse.is_finite().then_some(inverse)
    }

    /// Like [`Matrix4::try_invert`] but reports singularity as an error.
    pub fn checked_invert(&self) -> Result<Self> {
        self.try_invert()
            .ok_or_else(|| Error::SingularMatrix(self.determinant()))
    }

    /// General inverse. A singular matrix inverts to identity so that
    /// callers in a render loop never see NaN.
    pub fn invert(&self) -> Self {
        self.try_invert().unwrap_or_else(|| {
            log::debug!("invert: singular matrix, returning identity");
            Self::identity()
        })
    }

    /// Full homogeneous product with `(x, y, z, w)`.
    pub fn transform_homogeneous(&self, v: [f64; 4]) -> [f64; 4] {
        let mut out = [0.0; 4];
        for (i, row) in self.m.iter().enumerate() {
            out[i] = row[0] * v[0] + row[1] * v[1] + row[2] * v[2] + row[3] * v[3];
        }
        out
    }

    /// Transforms a point (`w = 1`). The result is divided by the resulting
    /// `w` when that is neither 0 nor 1.
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        let [x, y, z, w] = self.transform_homogeneous([p.x, p.y, p.z, 1.0]);
        if w != 0.0 && w != 1.0 && w.is_finite() {
            Vector3::new(x / w, y / w, z / w)
        } else {
            Vector3::new(x, y, z)
        }
    }

    /// Transforms a direction (`w = 0`), ignoring translation.
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        let [x, y, z, _] = self.transform_homogeneous([v.x, v.y, v.z, 0.0]);
        Vector3::new(x, y, z)
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    /// Column-major copy, the layout GPU uniforms and glam expect.
    pub fn to_cols_array(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = self.m[row][col];
            }
        }
        out
    }

    /// Column-major `f32` columns for uniform buffers.
    pub fn to_cols_array_2d_f32(&self) -> [[f32; 4]; 4] {
        let mut out = [[0.0; 4]; 4];
        for (col, column) in out.iter_mut().enumerate() {
            for (row, value) in column.iter_mut().enumerate() {
                *value = self.m[row][col] as f32;
            }
        }
        out
    }
}

fn span(from: f64, to: f64) -> f64 {
    let d = to - from;
    if d.abs() < MIN_SPAN {
        if d < 0.0 { -MIN_SPAN } else { MIN_SPAN }
    } else {
        d
    }
}

/// 2x2 sub-determinants shared by the determinant and the adjugate.
struct Cofactors {
    a: [f64; 16],
    b: [f64; 12],
    det: f64,
}

impl Cofactors {
    fn new(matrix: &Matrix4) -> Self {
        let mut a = [0.0; 16];
        for (i, v) in matrix.m.iter().flatten().enumerate() {
            a[i] = *v;
        }
        let b = [
            a[0] * a[5] - a[1] * a[4],
            a[0] * a[6] - a[2] * a[4],
            a[0] * a[7] - a[3] * a[4],
            a[1] * a[6] - a[2] * a[5],
            a[1] * a[7] - a[3] * a[5],
            a[2] * a[7] - a[3] * a[6],
            a[8] * a[13] - a[9] * a[12],
            a[8] * a[14] - a[10] * a[12],
            a[8] * a[15] - a[11] * a[12],
            a[9] * a[14] - a[10] * a[13],
            a[9] * a[15] - a[11] * a[13],
            a[10] * a[15] - a[11] * a[14],
        ];
        let det = b[0] * b[11] - b[1] * b[10] + b[2] * b[9] + b[3] * b[8] - b[4] * b[7]
            + b[5] * b[6];
        Self { a, b, det }
    }

    fn inverse(&self) -> Matrix4 {
        let (a, b) = (&self.a, &self.b);
        let inv = 1.0 / self.det;
        let out = [
            (a[5] * b[11] - a[6] * b[10] + a[7] * b[9]) * inv,
            (a[2] * b[10] - a[1] * b[11] - a[3] * b[9]) * inv,
            (a[13] * b[5] - a[14] * b[4] + a[15] * b[3]) * inv,
            (a[10] * b[4] - a[9] * b[5] - a[11] * b[3]) * inv,
            (a[6] * b[8] - a[4] * b[11] - a[7] * b[7]) * inv,
            (a[0] * b[11] - a[2] * b[8] + a[3] * b[7]) * inv,
            (a[14] * b[2] - a[12] * b[5] - a[15] * b[1]) * inv,
            (a[8] * b[5] - a[10] * b[2] + a[11] * b[1]) * inv,
            (a[4] * b[10] - a[5] * b[8] + a[7] * b[6]) * inv,
            (a[1] * b[8] - a[0] * b[10] - a[3] * b[6]) * inv,
            (a[12] * b[4] - a[13] * b[2] + a[15] * b[0]) * inv,
            (a[9] * b[2] - a[8] * b[4] - a[11] * b[0]) * inv,
            (a[5] * b[7] - a[4] * b[9] - a[6] * b[6]) * inv,
            (a[0] * b[9] - a[1] * b[7] + a[2] * b[6]) * inv,
            (a[13] * b[1] - a[12] * b[3] - a[14] * b[0]) * inv,
            (a[8] * b[3] - a[9] * b[1] + a[10] * b[0]) * inv,
        ];
        let mut result = Matrix4::zero();
        for (i, v) in out.into_iter().enumerate() {
            result.m[i / 4][i % 4] = v;
        }
        result
    }
}

impl Mul for Matrix4 {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        self.multiply(&other)
    }
}

impl Mul<Vector3> for Matrix4 {
    type Output = Vector3;
    fn mul(self, p: Vector3) -> Vector3 {
        self.transform_point(p)
    }
}

impl From<Matrix4> for glam::DMat4 {
    fn from(m: Matrix4) -> Self {
        glam::DMat4::from_cols_array(&m.to_cols_array())
    }
}

impl From<glam::DMat4> for Matrix4 {
    fn from(m: glam::DMat4) -> Self {
        Matrix4::from_rows(m.transpose().to_cols_array_2d())
    }
}

impl From<Matrix4> for glam::Mat4 {
    fn from(m: Matrix4) -> Self {
        glam::Mat4::from_cols_array_2d(&m.to_cols_array_2d_f32())
    }
}
