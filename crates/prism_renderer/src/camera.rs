//! Camera for ray generation.

use crate::sampling::random_in_unit_disk;
use crate::Ray;
use prism_core::CameraDescription;
use prism_math::{Point3, Vec3};
use rand::RngCore;

/// Pinhole or thin-lens camera.
///
/// All derived values are computed once in [`Camera::new`]; the camera is
/// immutable afterwards and shared read-only by every worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,

    // Orthonormal basis: w points backwards, away from the scene
    u: Vec3,
    v: Vec3,
    w: Vec3,

    lens_radius: f64,
}

impl Camera {
    /// Build a camera.
    ///
    /// - `vfov`: vertical field of view in degrees
    /// - `aspect_ratio`: viewport width over height
    /// - `aperture`: lens diameter, zero for a pinhole
    /// - `focus_dist`: distance to the plane of perfect focus
    pub fn new(
        look_from: Point3,
        look_at: Point3,
        vup: Vec3,
        vfov: f64,
        aspect_ratio: f64,
        aperture: f64,
        focus_dist: f64,
    ) -> Self {
        // Calculate viewport dimensions
        let theta = vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Calculate camera basis vectors
        let w = (look_from - look_at).normalize();
        let u = vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = look_from;
        let horizontal = focus_dist * viewport_width * u;
        let vertical = focus_dist * viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - focus_dist * w;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: aperture / 2.0,
        }
    }

    /// Build a camera from a scene description.
    pub fn from_description(desc: &CameraDescription, aspect_ratio: f64) -> Self {
        Self::new(
            desc.look_from.into(),
            desc.look_at.into(),
            desc.vup.into(),
            desc.vfov,
            aspect_ratio,
            desc.aperture,
            desc.focus_dist,
        )
    }

    /// Generate a ray through viewport coordinates `(s, t)`.
    ///
    /// `(0, 0)` is the lower-left corner and `(1, 1)` the upper-right.
    /// With a non-zero aperture the origin is jittered across the lens disk.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let origin = self.origin + offset;
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(origin, target - origin)
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Unit vectors `(u, v, w)`: right, up, and backwards from the view direction.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn lens_radius(&self) -> f64 {
        self.lens_radius
    }
}
