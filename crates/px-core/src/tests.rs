#[cfg(test)]
mod tests {
    use glam::{DMat4, DVec3};

    use crate::{BoundingBox, Error, Matrix4, Ray, Vector3};

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < TOLERANCE, "{a} != {b}");
    }

    fn assert_vec_close(a: Vector3, b: Vector3) {
        assert!(a.distance_to(b) < TOLERANCE, "{a:?} != {b:?}");
    }

    fn assert_matrix_close(a: &Matrix4, b: &Matrix4, tolerance: f64) {
        for row in 0..4 {
            for col in 0..4 {
                let (x, y) = (a.get(row, col), b.get(row, col));
                assert!((x - y).abs() < tolerance, "[{row}][{col}]: {x} != {y}");
            }
        }
    }

    #[test]
    fn test_vector_arithmetic() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vector3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vector3::X.cross(Vector3::Y), Vector3::Z);
        assert_eq!(Vector3::Y.cross(Vector3::X), -Vector3::Z);
        assert_close(Vector3::new(3.0, 4.0, 0.0).length(), 5.0);
        assert_close(a.distance_to(b), 27.0_f64.sqrt());
    }

    #[test]
    fn test_vector_conversions() {
        assert_eq!(Vector3::from([1.0, 2.0, 3.0]), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(Vector3::from((1.0, 2.0, 3.0)), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(DVec3::from(Vector3::Z), DVec3::Z);
    }

    #[test]
    fn test_normalize() {
        assert_vec_close(Vector3::new(0.0, 0.0, 5.0).normalize(), Vector3::Z);
        assert_close(Vector3::new(1.0, -2.0, 3.0).normalize().length(), 1.0);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);
        assert_eq!(Vector3::new(1e-12, 0.0, 0.0).normalize(), Vector3::ZERO);
    }

    #[test]
    fn test_perspective_matches_glam() {
        let ours = Matrix4::perspective(60f64.to_radians(), 1.5, 0.1, 100.0);
        let reference = Matrix4::from(DMat4::perspective_rh_gl(60f64.to_radians(), 1.5, 0.1, 100.0));
        assert_matrix_close(&ours, &reference, 1e-12);
        assert_eq!(ours.get(3, 3), 0.0);
        assert_eq!(ours.get(3, 2), -1.0);
    }

    #[test]
    fn test_orthographic_matches_glam() {
        let ours = Matrix4::orthographic(-4.0, 2.0, -1.0, 3.0, 0.5, 50.0);
        let reference = Matrix4::from(DMat4::orthographic_rh_gl(-4.0, 2.0, -1.0, 3.0, 0.5, 50.0));
        assert_matrix_close(&ours, &reference, 1e-12);
        assert_eq!(ours.get(3, 3), 1.0);
    }

    #[test]
    fn test_orthographic_zero_width_stays_finite() {
        let m = Matrix4::orthographic(1.0, 1.0, -1.0, 1.0, 0.1, 10.0);
        assert!(m.is_finite());
    }

    #[test]
    fn test_look_at_matches_glam() {
        let eye = Vector3::new(3.0, 4.0, 5.0);
        let target = Vector3::new(-1.0, 0.5, 2.0);
        let ours = Matrix4::look_at(eye, target, Vector3::Y);
        let reference = Matrix4::from(DMat4::look_at_rh(eye.into(), target.into(), DVec3::Y));
        assert_matrix_close(&ours, &reference, 1e-12);
    }

    #[test]
    fn test_look_at_moves_target_onto_negative_z() {
        let view = Matrix4::look_at(Vector3::new(0.0, 0.0, 10.0), Vector3::ZERO, Vector3::Y);
        assert_vec_close(view.transform_point(Vector3::ZERO), Vector3::new(0.0, 0.0, -10.0));
    }

    #[test]
    fn test_look_at_eye_equals_target_falls_back_to_z() {
        let eye = Vector3::new(1.0, 2.0, 3.0);
        let view = Matrix4::look_at(eye, eye, Vector3::Y);

        assert!(view.is_finite());
        let [right, up, forward] = Matrix4::view_basis(eye, eye, Vector3::Y);
        assert_eq!(forward, Vector3::Z);
        assert_vec_close(right, Vector3::X);
        assert_vec_close(up, Vector3::Y);
        assert!(view.try_invert().is_some());
    }

    #[test]
    fn test_look_at_up_parallel_to_view_stays_finite() {
        let view = Matrix4::look_at(Vector3::new(0.0, 10.0, 0.0), Vector3::ZERO, Vector3::Y);
        assert!(view.is_finite());

        let [right, up, forward] = Matrix4::view_basis(Vector3::new(0.0, 10.0, 0.0), Vector3::ZERO, Vector3::Y);
        assert_vec_close(forward, Vector3::Y);
        assert_close(right.length(), 1.0);
        assert_close(up.length(), 1.0);
        assert_close(right.dot(forward), 0.0);
    }

    #[test]
    fn test_multiply_is_not_commutative() {
        let t = Matrix4::translation(Vector3::new(1.0, 0.0, 0.0));
        let p = Matrix4::perspective(1.0, 1.0, 0.1, 10.0);
        assert_ne!(t * p, p * t);
        assert_eq!(t * Matrix4::identity(), t);
    }

    #[test]
    fn test_invert_round_trips_engine_matrices() {
        let view = Matrix4::look_at(Vector3::new(2.0, 3.0, 7.0), Vector3::new(0.5, 0.0, -1.0), Vector3::Y);
        let perspective = Matrix4::perspective(45f64.to_radians(), 16.0 / 9.0, 0.1, 1000.0);
        let orthographic = Matrix4::orthographic(-5.0, 5.0, -3.0, 3.0, 0.1, 100.0);

        for m in [view, perspective, orthographic, perspective * view, orthographic * view] {
            let product = m * m.invert();
            assert_matrix_close(&product, &Matrix4::identity(), 1e-9);
        }
    }

    #[test]
    fn test_invert_matches_glam() {
        let m = Matrix4::perspective(1.2, 1.3, 0.5, 40.0)
            * Matrix4::look_at(Vector3::new(1.0, -2.0, 4.0), Vector3::ZERO, Vector3::Z);
        let reference = Matrix4::from(DMat4::from(m).inverse());
        assert_matrix_close(&m.invert(), &reference, 1e-9);
        assert_close(m.determinant(), DMat4::from(m).determinant());
    }

    #[test]
    fn test_singular_matrix() {
        let singular = Matrix4::zero();
        assert!(singular.try_invert().is_none());
        assert_eq!(singular.invert(), Matrix4::identity());
        assert!(matches!(singular.checked_invert(), Err(Error::SingularMatrix(_))));
    }

    #[test]
    fn test_transform_point_and_vector() {
        let t = Matrix4::translation(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_point(Vector3::ZERO), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_vector(Vector3::X), Vector3::X);
    }

    #[test]
    fn test_transform_point_divides_by_w() {
        let p = Matrix4::perspective(90f64.to_radians(), 1.0, 1.0, 100.0);
        let ndc = p.transform_point(Vector3::new(0.0, 0.0, -1.0));
        assert_close(ndc.z, -1.0);
        let ndc = p.transform_point(Vector3::new(0.0, 0.0, -100.0));
        assert_close(ndc.z, 1.0);
    }

    #[test]
    fn test_column_major_layout() {
        let t = Matrix4::translation(Vector3::new(1.0, 2.0, 3.0));
        let cols = t.to_cols_array();
        assert_eq!(&cols[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(t.to_cols_array_2d_f32()[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(glam::Mat4::from(t).w_axis, glam::Vec4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn test_ray_sphere_intersection() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), -Vector3::Z);
        assert_close(ray.intersect_sphere(Vector3::ZERO, 1.0).unwrap(), 9.0);
        assert!(ray.intersect_sphere(Vector3::new(5.0, 0.0, 0.0), 1.0).is_none());
        assert!(ray.intersect_sphere(Vector3::new(0.0, 0.0, 20.0), 1.0).is_none());

        let inside = Ray::new(Vector3::ZERO, Vector3::X);
        assert_close(inside.intersect_sphere(Vector3::ZERO, 2.0).unwrap(), 2.0);
    }

    #[test]
    fn test_ray_box_intersection() {
        let bounds = BoundingBox::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let ray = Ray::between(Vector3::new(0.0, 0.0, 5.0), Vector3::ZERO);
        assert_close(ray.intersect_box(&bounds).unwrap(), 4.0);
        assert_vec_close(ray.at(4.0), Vector3::new(0.0, 0.0, 1.0));

        let miss = Ray::new(Vector3::new(3.0, 0.0, 5.0), -Vector3::Z);
        assert!(miss.intersect_box(&bounds).is_none());
    }

    #[test]
    fn test_bounding_box() {
        let bounds = BoundingBox::from_points([
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-1.0, -2.0, -3.0),
        ])
        .unwrap();

        assert_eq!(bounds.min, Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(bounds.max, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(bounds.center(), Vector3::ZERO);
        assert!(bounds.contains(Vector3::ZERO));
        assert!(BoundingBox::from_points([]).is_none());
    }
}
