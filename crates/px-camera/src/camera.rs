//! Camera state, cached matrices, movement and picking.
//!
//! Numeric input is clamped rather than rejected, and degenerate geometry
//! falls back to documented axes, so nothing here can fail or hand NaN to a
//! running render loop.

use std::fmt;
use std::rc::Rc;

use px_core::{BoundingBox, Matrix4, Ray, Vector3};

use crate::cache::MatrixCache;
use crate::options::{CameraOptions, Projection};
use crate::uniform::CameraUniform;

pub const MIN_FOV: f64 = 1.0;
pub const MAX_FOV: f64 = 179.0;
/// Lower bound for `near`, `aspect`, and the `near`..`far` gap.
pub const EPSILON: f64 = 0.001;

/// Orbit elevation stays this far from the poles, in radians (89 degrees).
const MAX_ELEVATION: f64 = 89.0 * std::f64::consts::PI / 180.0;
/// Keeps the perspective divide finite for points on the eye plane.
const MIN_W: f64 = 1e-12;

/// Zero-argument function evaluated by [`Camera::refresh_bindings`].
pub type Binding = Rc<dyn Fn() -> Vector3>;

pub struct Camera {
    position: Vector3,
    target: Vector3,
    up: Vector3,
    fov: f64,
    near: f64,
    far: f64,
    aspect: f64,
    projection: Projection,
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,

    projection_cache: MatrixCache,
    view_cache: MatrixCache,
    view_projection_cache: MatrixCache,
    inverse_view_cache: MatrixCache,
    inverse_view_projection_cache: MatrixCache,

    position_binding: Option<Binding>,
    look_at_binding: Option<Binding>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraOptions::default())
    }
}

impl Clone for Camera {
    /// Copies all state and shares the binding functions; caches start dirty.
    fn clone(&self) -> Self {
        Self {
            position: self.position,
            target: self.target,
            up: self.up,
            fov: self.fov,
            near: self.near,
            far: self.far,
            aspect: self.aspect,
            projection: self.projection,
            left: self.left,
            right: self.right,
            bottom: self.bottom,
            top: self.top,
            projection_cache: MatrixCache::Dirty,
            view_cache: MatrixCache::Dirty,
            view_projection_cache: MatrixCache::Dirty,
            inverse_view_cache: MatrixCache::Dirty,
            inverse_view_projection_cache: MatrixCache::Dirty,
            position_binding: self.position_binding.clone(),
            look_at_binding: self.look_at_binding.clone(),
        }
    }
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("position", &self.position)
            .field("target", &self.target)
            .field("up", &self.up)
            .field("fov", &self.fov)
            .field("near", &self.near)
            .field("far", &self.far)
            .field("aspect", &self.aspect)
            .field("projection", &self.projection)
            .field("ortho_bounds", &self.ortho_bounds())
            .field("position_binding", &self.position_binding.is_some())
            .field("look_at_binding", &self.look_at_binding.is_some())
            .finish()
    }
}

impl Camera {
    pub fn new(options: CameraOptions) -> Self {
        let defaults = CameraOptions::default();
        let mut camera = Self {
            position: defaults.position.into(),
            target: defaults.look_at.into(),
            up: defaults.up.into(),
            fov: defaults.fov,
            near: defaults.near,
            far: defaults.far,
            aspect: defaults.aspect,
            projection: defaults.projection,
            left: defaults.left,
            right: defaults.right,
            bottom: defaults.bottom,
            top: defaults.top,
            projection_cache: MatrixCache::Dirty,
            view_cache: MatrixCache::Dirty,
            view_projection_cache: MatrixCache::Dirty,
            inverse_view_cache: MatrixCache::Dirty,
            inverse_view_projection_cache: MatrixCache::Dirty,
            position_binding: None,
            look_at_binding: None,
        };

        // Run everything through the setters so options get the same clamping.
        camera.set_near(options.near);
        camera.set_far(options.far);
        camera.set_fov(options.fov);
        camera.set_aspect(options.aspect);
        camera.set_projection(options.projection);
        camera.set_ortho_bounds(options.left, options.right, options.bottom, options.top);
        camera.set_up(options.up);
        camera.set_position(options.position);
        camera.set_look_at(options.look_at);
        camera
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn target(&self) -> Vector3 {
        self.target
    }

    /// The stored (normalized) up vector. See [`Camera::up`] for the
    /// re-orthogonalized one.
    pub fn up_vector(&self) -> Vector3 {
        self.up
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn near(&self) -> f64 {
        self.near
    }

    pub fn far(&self) -> f64 {
        self.far
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// `(left, right, bottom, top)`
    pub fn ortho_bounds(&self) -> (f64, f64, f64, f64) {
        (self.left, self.right, self.bottom, self.top)
    }

    pub fn set_fov(&mut self, fov: f64) {
        if !fov.is_finite() {
            log::debug!("set_fov: ignoring non-finite value {fov}");
            return;
        }
        let clamped = fov.clamp(MIN_FOV, MAX_FOV);
        if clamped != fov {
            log::debug!("set_fov: {fov} clamped to {clamped}");
        }
        self.fov = clamped;
        self.invalidate_projection();
    }

    pub fn set_near(&mut self, near: f64) {
        if !near.is_finite() {
            log::debug!("set_near: ignoring non-finite value {near}");
            return;
        }
        let clamped = near.max(EPSILON);
        if clamped != near {
            log::debug!("set_near: {near} clamped to {clamped}");
        }
        self.near = clamped;
        self.enforce_depth_range();
        self.invalidate_projection();
    }

    /// Sets the far plane; it is pushed past `near` if needed.
    pub fn set_far(&mut self, far: f64) {
        if !far.is_finite() {
            log::debug!("set_far: ignoring non-finite value {far}");
            return;
        }
        self.far = far;
        self.enforce_depth_range();
        self.invalidate_projection();
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        if !aspect.is_finite() {
            log::debug!("set_aspect: ignoring non-finite value {aspect}");
            return;
        }
        let clamped = aspect.max(EPSILON);
        if clamped != aspect {
            log::debug!("set_aspect: {aspect} clamped to {clamped}");
        }
        self.aspect = clamped;
        self.invalidate_projection();
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.invalidate_projection();
    }

    /// Sets all four orthographic bounds at once. Non-finite input is ignored.
    pub fn set_ortho_bounds(&mut self, left: f64, right: f64, bottom: f64, top: f64) {
        if ![left, right, bottom, top].iter().all(|v| v.is_finite()) {
            log::debug!("set_ortho_bounds: ignoring non-finite bounds");
            return;
        }
        self.left = left;
        self.right = right;
        self.bottom = bottom;
        self.top = top;
        self.invalidate_projection();
    }

    pub fn set_position(&mut self, position: impl Into<Vector3>) {
        let position = position.into();
        if !position.is_finite() {
            log::debug!("set_position: ignoring non-finite {position:?}");
            return;
        }
        self.position = position;
        self.invalidate_view();
    }

    pub fn set_look_at(&mut self, target: impl Into<Vector3>) {
        let target = target.into();
        if !target.is_finite() {
            log::debug!("set_look_at: ignoring non-finite {target:?}");
            return;
        }
        self.target = target;
        self.invalidate_view();
    }

    /// Stores `up` normalized. A zero-length `up` is ignored.
    pub fn set_up(&mut self, up: impl Into<Vector3>) {
        let up = up.into().normalize();
        if up == Vector3::ZERO {
            log::debug!("set_up: ignoring zero-length up vector");
            return;
        }
        self.up = up;
        self.invalidate_view();
    }

    fn enforce_depth_range(&mut self) {
        if self.far <= self.near {
            self.far = self.near + EPSILON;
            log::debug!("far plane moved to {} to stay beyond near {}", self.far, self.near);
        }
    }

    fn invalidate_projection(&mut self) {
        self.projection_cache.invalidate();
        self.view_projection_cache.invalidate();
        self.inverse_view_projection_cache.invalidate();
    }

    fn invalidate_view(&mut self) {
        self.view_cache.invalidate();
        self.inverse_view_cache.invalidate();
        self.view_projection_cache.invalidate();
        self.inverse_view_projection_cache.invalidate();
    }

    pub fn is_projection_cached(&self) -> bool {
        self.projection_cache.is_clean()
    }

    pub fn is_view_cached(&self) -> bool {
        self.view_cache.is_clean()
    }

    pub fn is_view_projection_cached(&self) -> bool {
        self.view_projection_cache.is_clean()
    }

    pub fn projection_matrix(&mut self) -> Rc<Matrix4> {
        let (projection, fov, aspect, near, far) =
            (self.projection, self.fov, self.aspect, self.near, self.far);
        let (left, right, bottom, top) = self.ortho_bounds();
        self.projection_cache.get_or_update(|| {
            log::trace!(target: "px_camera", "recomputing {projection:?} projection");
            match projection {
                Projection::Perspective => Matrix4::perspective(fov.to_radians(), aspect, near, far),
                Projection::Orthographic => Matrix4::orthographic(left, right, bottom, top, near, far),
            }
        })
    }

    pub fn view_matrix(&mut self) -> Rc<Matrix4> {
        let (position, target, up) = (self.position, self.target, self.up);
        self.view_cache.get_or_update(|| {
            log::trace!(target: "px_camera", "recomputing view matrix");
            Matrix4::look_at(position, target, up)
        })
    }

    /// `projection * view`
    pub fn view_projection_matrix(&mut self) -> Rc<Matrix4> {
        let projection = self.projection_matrix();
        let view = self.view_matrix();
        self.view_projection_cache
            .get_or_update(|| projection.multiply(&view))
    }

    /// Camera-to-world transform.
    pub fn inverse_view_matrix(&mut self) -> Rc<Matrix4> {
        let view = self.view_matrix();
        self.inverse_view_cache.get_or_update(|| view.invert())
    }

    pub fn inverse_view_projection_matrix(&mut self) -> Rc<Matrix4> {
        let view_projection = self.view_projection_matrix();
        self.inverse_view_projection_cache
            .get_or_update(|| view_projection.invert())
    }

    /// Unit vector from the position towards the target.
    pub fn forward(&self) -> Vector3 {
        -self.basis()[2]
    }

    pub fn right(&self) -> Vector3 {
        self.basis()[0]
    }

    /// Up re-orthogonalized against the current forward direction.
    pub fn up(&self) -> Vector3 {
        self.basis()[1]
    }

    fn basis(&self) -> [Vector3; 3] {
        Matrix4::view_basis(self.position, self.target, self.up)
    }

    /// Dolly: moves position and target along the view direction.
    pub fn move_forward(&mut self, distance: f64) {
        self.translate(self.forward() * distance);
    }

    /// Strafes position and target along [`Camera::right`], keeping the
    /// view direction.
    pub fn move_right(&mut self, distance: f64) {
        self.translate(self.right() * distance);
    }

    /// Moves position and target along [`Camera::up`], keeping the view
    /// direction.
    pub fn move_up(&mut self, distance: f64) {
        self.translate(self.up() * distance);
    }

    /// Rigid translation in the view plane.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.translate(self.right() * dx + self.up() * dy);
    }

    fn translate(&mut self, delta: Vector3) {
        if !delta.is_finite() {
            return;
        }
        self.position += delta;
        self.target += delta;
        self.invalidate_view();
    }

    /// Rotates the position about the target on a sphere, with the stored up
    /// vector as the pole. Angles are in radians; elevation changes stop one
    /// degree short of either pole.
    pub fn orbit(&mut self, delta_azimuth: f64, delta_elevation: f64) {
        if !delta_azimuth.is_finite() || !delta_elevation.is_finite() {
            return;
        }
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius < EPSILON * EPSILON {
            log::debug!("orbit: position coincides with target, nothing to orbit");
            return;
        }

        let pole = self.up;
        let (e1, e2) = orbit_basis(pole);
        let (a, b, h) = (offset.dot(e1), offset.dot(e2), offset.dot(pole));

        // A camera already past the limit may stay there but not move closer.
        let current = h.atan2((a * a + b * b).sqrt());
        let limit = MAX_ELEVATION.max(current.abs());
        let azimuth = b.atan2(a) + delta_azimuth;
        let elevation = (current + delta_elevation).clamp(-limit, limit);

        let direction = e1 * (elevation.cos() * azimuth.cos())
            + e2 * (elevation.cos() * azimuth.sin())
            + pole * elevation.sin();
        self.position = self.target + direction.normalize() * radius;
        self.invalidate_view();
    }

    /// Scales the distance to the target by `factor` (< 1 moves closer).
    pub fn zoom(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            log::debug!("zoom: ignoring factor {factor}");
            return;
        }
        let offset = self.position - self.target;
        self.position = self.target + offset * factor;
        self.invalidate_view();
    }

    /// Re-targets at the box center and backs off until its bounding sphere
    /// fits the view. The far plane is extended if the box would be clipped.
    pub fn fit_bounds(&mut self, bounds: &BoundingBox) {
        let center = bounds.center();
        let radius = bounds.radius().max(EPSILON);

        let mut direction = (self.position - self.target).normalize();
        if direction == Vector3::ZERO {
            direction = Vector3::Z;
        }

        let distance = match self.projection {
            Projection::Perspective => {
                let half_v = self.fov.to_radians() / 2.0;
                let half_h = (half_v.tan() * self.aspect).atan();
                radius / half_v.min(half_h).sin()
            }
            Projection::Orthographic => {
                let half_h = radius * (1.0 / self.aspect).max(1.0);
                let half_w = half_h * self.aspect;
                self.set_ortho_bounds(-half_w, half_w, -half_h, half_h);
                radius * 2.0
            }
        };

        self.target = center;
        self.position = center + direction * distance;
        if self.far < distance + radius {
            self.set_far(distance + radius * 2.0);
        }
        self.invalidate_view();
    }

    /// World point to normalized device coordinates (after the divide).
    pub fn project_to_ndc(&mut self, point: impl Into<Vector3>) -> Vector3 {
        let p = point.into();
        let [x, y, z, w] = self
            .view_projection_matrix()
            .transform_homogeneous([p.x, p.y, p.z, 1.0]);
        let w = if w.abs() < MIN_W { MIN_W.copysign(w) } else { w };
        Vector3::new(x / w, y / w, z / w)
    }

    /// World point to pixel coordinates with the origin at the top-left.
    pub fn project_to_pixel(&mut self, point: impl Into<Vector3>, width: f64, height: f64) -> (f64, f64) {
        let ndc = self.project_to_ndc(point);
        ((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height)
    }

    /// True when `point` lies on the viewing side of the camera plane.
    pub fn is_point_in_front(&self, point: impl Into<Vector3>) -> bool {
        self.forward().dot(point.into() - self.position) > 0.0
    }

    /// Ray through an NDC point (`x`, `y` in [-1, 1]).
    ///
    /// Perspective rays start at the camera position and pass through the
    /// unprojected far-plane point. Orthographic rays are parallel, so they
    /// start on the near plane instead.
    pub fn screen_to_ray(&mut self, ndc_x: f64, ndc_y: f64) -> Ray {
        let inverse = self.inverse_view_projection_matrix();
        let near = inverse.transform_point(Vector3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.transform_point(Vector3::new(ndc_x, ndc_y, 1.0));

        let ray = match self.projection {
            Projection::Perspective => Ray::between(self.position, far),
            Projection::Orthographic => Ray::between(near, far),
        };
        if ray.direction == Vector3::ZERO {
            return Ray::new(self.position, self.forward());
        }
        ray
    }

    /// Ray through a pixel, with the origin at the top-left of a
    /// `width` x `height` viewport.
    pub fn pixel_to_ray(&mut self, px: f64, py: f64, width: f64, height: f64) -> Ray {
        let width = if width > 0.0 { width } else { 1.0 };
        let height = if height > 0.0 { height } else { 1.0 };
        let ndc_x = 2.0 * px / width - 1.0;
        let ndc_y = 1.0 - 2.0 * py / height;
        self.screen_to_ray(ndc_x, ndc_y)
    }

    /// Position is re-evaluated from `f` on every [`Camera::refresh_bindings`].
    pub fn bind_position<F, V>(&mut self, f: F)
    where
        F: Fn() -> V + 'static,
        V: Into<Vector3>,
    {
        self.position_binding = Some(Rc::new(move || f().into()));
    }

    /// Target is re-evaluated from `f` on every [`Camera::refresh_bindings`].
    pub fn bind_look_at<F, V>(&mut self, f: F)
    where
        F: Fn() -> V + 'static,
        V: Into<Vector3>,
    {
        self.look_at_binding = Some(Rc::new(move || f().into()));
    }

    pub fn unbind_position(&mut self) {
        self.position_binding = None;
    }

    pub fn unbind_look_at(&mut self) {
        self.look_at_binding = None;
    }

    pub fn position_binding(&self) -> Option<&Binding> {
        self.position_binding.as_ref()
    }

    pub fn look_at_binding(&self) -> Option<&Binding> {
        self.look_at_binding.as_ref()
    }

    /// Evaluates the stored bindings and applies them through the setters.
    /// Call once per frame, before reading matrices.
    pub fn refresh_bindings(&mut self) {
        if let Some(binding) = self.position_binding.clone() {
            self.set_position(binding());
        }
        if let Some(binding) = self.look_at_binding.clone() {
            self.set_look_at(binding());
        }
    }

    pub fn uniform(&mut self) -> CameraUniform {
        let view_proj = self.view_projection_matrix();
        CameraUniform::new(&view_proj, self)
    }
}

/// Two unit axes spanning the plane perpendicular to `pole`. For a +Y pole
/// they are +Z and +X, so azimuth 0 looks from +Z.
fn orbit_basis(pole: Vector3) -> (Vector3, Vector3) {
    let mut e1 = (Vector3::Z - pole * Vector3::Z.dot(pole)).normalize();
    if e1 == Vector3::ZERO {
        e1 = (Vector3::X - pole * Vector3::X.dot(pole)).normalize();
    }
    (e1, pole.cross(e1))
}
