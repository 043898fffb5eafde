//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative bounce loop with configurable depth
//! - Sky gradient background
//! - Anti-aliasing via multi-sampling

use crate::sampling::gen_f64;
use crate::{Camera, Color, Hittable, Ray};
use prism_math::Interval;
use rand::RngCore;

/// Smallest accepted hit distance. Keeps scattered rays from re-hitting the
/// surface they start on.
const SHADOW_ACNE_T_MIN: f64 = 0.001;

/// Compute the color seen by a ray.
///
/// Follows the path for at most `depth` bounces, multiplying in each
/// material's attenuation. A path that runs out of bounces or is absorbed
/// contributes black; a path that escapes picks up the sky.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut attenuation = Color::ONE;
    let mut ray = *ray;

    for _ in 0..depth {
        let Some(rec) = world.hit(&ray, Interval::new(SHADOW_ACNE_T_MIN, f64::INFINITY)) else {
            return attenuation * sky_gradient(&ray);
        };

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                attenuation *= result.attenuation;
                ray = result.scattered;
            }
            None => return Color::ZERO,
        }
    }

    // Bounce limit exceeded, no more light is gathered
    Color::ZERO
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Sum `samples` jittered radiance samples for pixel column `i`, row `j`.
///
/// Rows count upwards from the bottom of the image. The result is the raw
/// sum; dividing by the sample count happens at output time.
#[allow(clippy::too_many_arguments)]
pub fn sample_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    image_width: u32,
    image_height: u32,
    samples: u32,
    max_depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    // A single column or row still maps onto the viewport without dividing by zero
    let u_span = f64::from(image_width.saturating_sub(1).max(1));
    let v_span = f64::from(image_height.saturating_sub(1).max(1));

    let mut color = Color::ZERO;
    for _ in 0..samples {
        let u = (f64::from(i) + gen_f64(rng)) / u_span;
        let v = (f64::from(j) + gen_f64(rng)) / v_span;
        let ray = camera.get_ray(u, v, rng);
        color += ray_color(&ray, world, max_depth, rng);
    }
    color
}
