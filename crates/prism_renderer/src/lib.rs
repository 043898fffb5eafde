//! Prism Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for spheres, triangles and rectangles with
//! diffuse, metal and glass surfaces.
//!
//! A render takes an immutable [`HittableList`] and [`Camera`], fans pixel
//! jobs out to a fixed pool of workers and hands back one unscaled
//! [`Pixel`] per image position. [`ImageBuffer`] turns those into a PNG or
//! PPM file.

mod camera;
mod hittable;
mod material;
mod output;
mod pipeline;
mod rectangle;
mod renderer;
pub mod sampling;
mod scene;
mod sphere;
mod triangle;

pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    reflect, refract, schlick, Dielectric, Lambertian, Material, Metal, ScatterResult,
    SurfaceMaterial,
};
pub use output::{linear_to_gamma, tone_map, ImageBuffer, OutputError, OutputResult};
pub use pipeline::{
    render, render_with_progress, Pixel, PixelJob, Progress, RenderError, RenderResult,
    RenderSettings,
};
pub use rectangle::Rectangle;
pub use renderer::{ray_color, sample_pixel, sky_gradient};
pub use scene::{build_material, build_primitive, build_world};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export the math types every caller needs
pub use prism_math::{Color, Interval, Point3, Ray, Vec3};
