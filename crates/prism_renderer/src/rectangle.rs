//! Rectangle primitive built from two triangles.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray, Triangle,
};
use prism_math::{Interval, Point3, Vec3};

/// A planar quadrilateral with corners `a`, `w`, `w + h` and `a + h`.
///
/// Nothing forces `h` to be perpendicular to `w - a`, so any parallelogram
/// works. Both halves share the material, so it is cloned once.
pub struct Rectangle<M: Material> {
    t1: Triangle<M>,
    t2: Triangle<M>,
}

impl<M: Material + Clone> Rectangle<M> {
    pub fn new(a: Point3, w: Point3, h: Vec3, material: M) -> Self {
        //   a+h ------- w+h
        //    |  t1   /   |
        //    |    /  t2  |
        //    a --------- w
        let t1 = Triangle::new(a, w, a + h, material.clone());
        let t2 = Triangle::new(a + h, w, w + h, material);

        Self { t1, t2 }
    }
}

impl<M: Material> Rectangle<M> {
    /// The two halves, sharing the `w` to `a + h` diagonal.
    pub fn triangles(&self) -> (&Triangle<M>, &Triangle<M>) {
        (&self.t1, &self.t2)
    }
}

impl<M: Material> Hittable for Rectangle<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // The halves only overlap on the diagonal, so the first hit is the hit
        self.t1.hit(ray, ray_t).or_else(|| self.t2.hit(ray, ray_t))
    }
}
