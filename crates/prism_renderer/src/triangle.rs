//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use prism_math::{Interval, Point3, Vec3};

/// Determinant below which a ray counts as parallel to the triangle.
const PARALLEL_EPSILON: f64 = 1e-5;

/// A triangle primitive.
///
/// The front face is the side from which `v0`, `v1`, `v2` appear
/// counter-clockwise.
pub struct Triangle<M: Material> {
    /// First vertex, the origin of both Möller-Trumbore edges
    v0: Point3,
    /// Edge `v1 - v0`
    a: Vec3,
    /// Edge `v2 - v0`
    b: Vec3,
    /// Edge `v2 - v1`
    c: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    /// Material
    material: M,
}

impl<M: Material> Triangle<M> {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Point3, v1: Point3, v2: Point3, material: M) -> Self {
        let a = v1 - v0;
        let b = v2 - v0;
        let c = v2 - v1;

        // Zero for degenerate triangles, which then never report a hit
        let normal = a.cross(b).normalize_or_zero();

        Self {
            v0,
            a,
            b,
            c,
            normal,
            material,
        }
    }

    /// Edge vectors `v1 - v0`, `v2 - v0` and `v2 - v1`.
    pub fn edges(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl<M: Material> Hittable for Triangle<M> {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let pvec = ray.direction().cross(self.b);
        let det = self.a.dot(pvec);

        // Ray is parallel to triangle
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - self.v0;
        let u = tvec.dot(pvec) * inv_det;
        if !Interval::new(0.0, 1.0).contains(u) {
            return None;
        }

        let qvec = tvec.cross(self.a);
        let v = ray.direction().dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = self.b.dot(qvec) * inv_det;
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, &self.material))
    }
}
