//! Arcball camera.
//!
//! The camera orbits a fixed target on a sphere parameterised by azimuth
//! (`phi`), elevation (`theta`) and radius. Every mutation recomputes the
//! derived position and matrices eagerly, so the accessors are plain reads.
//!
//! Conventions:
//! - left-handed world, `+Y` up
//! - clip-space depth in `[0, 1]` (wgpu)
//! - input deltas are expressed in degrees

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Vec2, Vec3};

/// Margin kept between the elevation and the poles.
///
/// At exactly +/- pi/2 the eye sits on the up axis and the look-at basis
/// collapses.
const POLE_MARGIN: f32 = 1.0e-3;

/// Smallest radius reachable through [`Camera::zoom_by`].
const MIN_ZOOM_RADIUS: f32 = 1.0;

#[inline]
fn near_equal(a: f32, b: f32) -> bool {
    (a - b).abs() <= f32::EPSILON
}

/// Orbit camera around a fixed target.
#[derive(Debug, Clone)]
pub struct Camera {
    fov: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,

    radius: f32,
    phi: f32,
    theta: f32,

    target: Vec3,
    position: Vec3,
    forward: Vec3,

    projection: Mat4,
    view: Mat4,
}

impl Camera {
    /// Creates a camera five units away from the origin, looking down `+Z`.
    pub fn new() -> Self {
        let mut camera = Self {
            fov: 60.0_f32.to_radians(),
            aspect_ratio: 1.0,
            near: 0.001,
            far: 1000.0,
            radius: 5.0,
            phi: PI + FRAC_PI_2,
            theta: 0.0,
            target: Vec3::ZERO,
            position: Vec3::ZERO,
            forward: Vec3::ZERO,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
        };

        camera.update_position();
        camera.update_view();
        camera.update_projection();
        camera
    }

    /// Moves the camera towards (`amount > 0`) or away from the target.
    ///
    /// The radius never drops below one unit.
    pub fn zoom_by(&mut self, amount: f32) {
        if amount.abs() <= f32::EPSILON {
            return;
        }

        self.radius = (self.radius - amount).max(MIN_ZOOM_RADIUS);
        self.update_position();
        self.update_view();
    }

    /// Orbits the camera by `delta` degrees (`x`: azimuth, `y`: elevation).
    pub fn rotate_by(&mut self, delta: Vec2) {
        if delta.x.abs() <= f32::EPSILON && delta.y.abs() <= f32::EPSILON {
            return;
        }

        let limit = FRAC_PI_2 - POLE_MARGIN;
        self.phi -= delta.x.to_radians();
        self.theta = (self.theta + delta.y.to_radians()).clamp(-limit, limit);
        self.update_position();
        self.update_view();
    }

    /// Sets the viewport aspect ratio (width / height).
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if near_equal(self.aspect_ratio, aspect_ratio) {
            return;
        }

        self.aspect_ratio = aspect_ratio;
        self.update_projection();
    }

    /// Sets the orbit radius directly. Unlike zooming, this is not clamped.
    pub fn set_radius(&mut self, radius: f32) {
        if near_equal(self.radius, radius) {
            return;
        }

        self.radius = radius;
        self.update_position();
        self.update_view();
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Vector from the target to the eye. Not normalised.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Returns `(phi, theta)` in radians.
    #[inline]
    pub fn angles(&self) -> (f32, f32) {
        (self.phi, self.theta)
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    fn update_position(&mut self) {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();

        self.position = Vec3::new(
            self.radius * cos_theta * cos_phi,
            self.radius * sin_theta,
            self.radius * cos_theta * sin_phi,
        );
    }

    fn update_projection(&mut self) {
        self.projection = Mat4::perspective_lh(self.fov, self.aspect_ratio, self.near, self.far);
    }

    fn update_view(&mut self) {
        self.forward = self.position - self.target;
        self.view = Mat4::look_at_lh(self.position, self.target, Vec3::Y);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec4;

    // ── defaults ──────────────────────────────────────────────────────────

    #[test]
    fn default_position_is_five_units_behind_origin() {
        let cam = Camera::new();
        assert!(cam.position().abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
        assert!(cam.forward().abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
    }

    #[test]
    fn default_view_maps_target_in_front_of_eye() {
        let cam = Camera::new();
        let target_in_view = cam.view() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(target_in_view.abs_diff_eq(Vec4::new(0.0, 0.0, 5.0, 1.0), 1e-5));
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn projection_matches_left_handed_zero_to_one() {
        let cam = Camera::new();
        let p = cam.projection();

        let y = 1.0 / (30.0_f32.to_radians()).tan();
        let z = 1000.0 / (1000.0 - 0.001);

        assert_relative_eq!(p.x_axis.x, y, epsilon = 1e-5);
        assert_relative_eq!(p.y_axis.y, y, epsilon = 1e-5);
        assert_relative_eq!(p.z_axis.z, z, epsilon = 1e-5);
        assert_relative_eq!(p.z_axis.w, 1.0);
        assert_relative_eq!(p.w_axis.z, -0.001 * z, epsilon = 1e-7);
        assert_relative_eq!(p.w_axis.w, 0.0);
    }

    #[test]
    fn near_and_far_planes_map_to_depth_range() {
        let cam = Camera::new();
        let p = cam.projection();

        let near = p * Vec4::new(0.0, 0.0, 0.001, 1.0);
        let far = p * Vec4::new(0.0, 0.0, 1000.0, 1.0);

        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-4);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn aspect_ratio_scales_x_only() {
        let mut cam = Camera::new();
        let before = cam.projection();
        cam.set_aspect_ratio(2.0);
        let after = cam.projection();

        assert_relative_eq!(after.x_axis.x, before.x_axis.x / 2.0, epsilon = 1e-5);
        assert_relative_eq!(after.y_axis.y, before.y_axis.y);
        assert_relative_eq!(cam.aspect_ratio(), 2.0);
    }

    #[test]
    fn set_aspect_ratio_ignores_nearly_equal_values() {
        let mut cam = Camera::new();
        cam.set_aspect_ratio(1.0 + f32::EPSILON * 0.5);
        assert_eq!(cam.aspect_ratio(), 1.0);
    }

    // ── zoom ──────────────────────────────────────────────────────────────

    #[test]
    fn zoom_moves_towards_target() {
        let mut cam = Camera::new();
        cam.zoom_by(2.0);
        assert_relative_eq!(cam.radius(), 3.0);
        assert_relative_eq!(cam.position().length(), 3.0, epsilon = 1e-5);
    }

    #[test]
    fn zoom_is_clamped_to_one_unit() {
        let mut cam = Camera::new();
        cam.zoom_by(100.0);
        assert_relative_eq!(cam.radius(), 1.0);
    }

    #[test]
    fn zoom_out_is_unbounded() {
        let mut cam = Camera::new();
        cam.zoom_by(-20.0);
        assert_relative_eq!(cam.radius(), 25.0);
    }

    #[test]
    fn zoom_ignores_epsilon_amounts() {
        let mut cam = Camera::new();
        let view = cam.view();
        cam.zoom_by(f32::EPSILON * 0.5);
        assert_eq!(cam.radius(), 5.0);
        assert_eq!(cam.view(), view);
    }

    // ── rotate ────────────────────────────────────────────────────────────

    #[test]
    fn rotate_azimuth_by_ninety_degrees() {
        let mut cam = Camera::new();
        // phi: 270deg -> 180deg, eye moves from -Z to -X.
        cam.rotate_by(Vec2::new(90.0, 0.0));
        assert!(cam.position().abs_diff_eq(Vec3::new(-5.0, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn rotate_elevation_raises_eye() {
        let mut cam = Camera::new();
        cam.rotate_by(Vec2::new(0.0, 30.0));
        let (_, theta) = cam.angles();
        assert_relative_eq!(theta, 30.0_f32.to_radians(), epsilon = 1e-6);
        assert_relative_eq!(cam.position().y, 2.5, epsilon = 1e-5);
        assert_relative_eq!(cam.position().length(), 5.0, epsilon = 1e-5);
    }

    #[test]
    fn elevation_is_clamped_below_the_poles() {
        let mut cam = Camera::new();
        cam.rotate_by(Vec2::new(0.0, 500.0));
        let (_, theta) = cam.angles();
        assert_relative_eq!(theta, FRAC_PI_2 - POLE_MARGIN);
        assert!(cam.view().is_finite());

        cam.rotate_by(Vec2::new(0.0, -1000.0));
        let (_, theta) = cam.angles();
        assert_relative_eq!(theta, -(FRAC_PI_2 - POLE_MARGIN));
        assert!(cam.view().is_finite());
    }

    #[test]
    fn rotate_ignores_zero_delta() {
        let mut cam = Camera::new();
        let before = cam.angles();
        cam.rotate_by(Vec2::ZERO);
        assert_eq!(cam.angles(), before);
    }

    // ── radius ────────────────────────────────────────────────────────────

    #[test]
    fn set_radius_is_not_clamped() {
        let mut cam = Camera::new();
        cam.set_radius(0.5);
        assert_relative_eq!(cam.radius(), 0.5);
        assert_relative_eq!(cam.forward().length(), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn view_projection_composes_projection_after_view() {
        let cam = Camera::new();
        let expected = cam.projection() * cam.view();
        assert!(cam.view_projection().abs_diff_eq(expected, 1e-6));
    }
}
