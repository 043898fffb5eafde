//! Prism math - vector algebra, rays and intervals for the path tracer.
//!
//! All geometry is double precision. `Vec3`, `Point3` and `Color` are the
//! same `glam::DVec3` type under different names, so a color can be scaled,
//! added and multiplied componentwise exactly like a direction.

// Re-export glam for convenience
pub use glam::{DQuat, DVec3};

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;

/// Generic direction or displacement.
pub type Vec3 = DVec3;

/// Position in world space.
pub type Point3 = DVec3;

/// Linear RGB intensity. Unclamped; values above 1.0 are legal until tone mapping.
pub type Color = DVec3;

/// Tolerance used by the approximate comparisons in tests across the workspace.
pub const EPSILON: f64 = 1e-5;

/// Returns true if `a` and `b` differ by less than [`EPSILON`].
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Componentwise [`approx_eq`] for vectors.
#[inline]
pub fn approx_eq_vec(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}
