//! Rays for pointer picking.
//!
//! A ray is `r(t) = origin + t * direction` for `t >= 0`.

use crate::bounding_box::BoundingBox;
use crate::vector3::Vector3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    /// Unit length when built by a camera; not required otherwise.
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// Ray from `origin` through `through`, with a normalized direction.
    pub fn between(origin: Vector3, through: Vector3) -> Self {
        Self::new(origin, (through - origin).normalize())
    }

    pub fn at(&self, t: f64) -> Vector3 {
        self.origin + self.direction * t
    }

    /// Parameter of the point on the ray closest to `point` (clamped to 0).
    pub fn closest_t(&self, point: Vector3) -> f64 {
        let len_sq = self.direction.length_squared();
        if len_sq == 0.0 {
            return 0.0;
        }
        ((point - self.origin).dot(self.direction) / len_sq).max(0.0)
    }

    /// Nearest non-negative hit parameter against a sphere.
    pub fn intersect_sphere(&self, center: Vector3, radius: f64) -> Option<f64> {
        let a = self.direction.length_squared();
        if a == 0.0 {
            return None;
        }
        let oc = self.origin - center;
        let half_b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = half_b * half_b - a * c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_d = disc.sqrt();
        let near = (-half_b - sqrt_d) / a;
        let far = (-half_b + sqrt_d) / a;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            // Origin is inside the sphere.
            Some(far)
        } else {
            None
        }
    }

    /// Entry parameter against an axis-aligned box (slab test).
    pub fn intersect_box(&self, bounds: &BoundingBox) -> Option<f64> {
        let origin = self.origin.to_array();
        let dir = self.direction.to_array();
        let min = bounds.min.to_array();
        let max = bounds.max.to_array();

        let mut t_min = 0.0_f64;
        let mut t_max = f64::INFINITY;
        for i in 0..3 {
            if dir[i].abs() < 1e-12 {
                if origin[i] < min[i] || origin[i] > max[i] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir[i];
            let mut t0 = (min[i] - origin[i]) * inv;
            let mut t1 = (max[i] - origin[i]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}
