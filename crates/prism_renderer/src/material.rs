//! Material trait for surface scattering.

use crate::sampling::{gen_f64, random_in_unit_sphere, random_unit_vector};
use crate::{hittable::HitRecord, Ray};
use prism_math::{Color, Vec3};
use rand::RngCore;

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Per-bounce color multiplier
    pub attenuation: Color,
    /// Continuation of the light path
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Materials hold no render state. `scatter` depends only on its arguments
/// and the random generator it is handed.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Cosine-weighted: offset the normal by a random point on the unit sphere
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz can push a grazing reflection below the surface; that light is absorbed
        if direction.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, direction),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract || schlick(cos_theta, refraction_ratio) > gen_f64(rng) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// The closed set of materials a scene file can name.
///
/// Lets primitives built from descriptors share one concrete material type
/// while the hand-built API stays generic over [`Material`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceMaterial {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}

impl Material for SurfaceMaterial {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            SurfaceMaterial::Lambertian(m) => m.scatter(ray_in, rec, rng),
            SurfaceMaterial::Metal(m) => m.scatter(ray_in, rec, rng),
            SurfaceMaterial::Dielectric(m) => m.scatter(ray_in, rec, rng),
        }
    }
}

impl From<Lambertian> for SurfaceMaterial {
    fn from(m: Lambertian) -> Self {
        SurfaceMaterial::Lambertian(m)
    }
}

impl From<Metal> for SurfaceMaterial {
    fn from(m: Metal) -> Self {
        SurfaceMaterial::Metal(m)
    }
}

impl From<Dielectric> for SurfaceMaterial {
    fn from(m: Dielectric) -> Self {
        SurfaceMaterial::Dielectric(m)
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface (Snell's law).
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance
#[inline]
pub fn schlick(cosine: f64, ref_idx: f64) -> f64 {
    let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ray_color, HittableList, Sphere};
    use prism_math::{approx_eq_vec, Point3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record<'a>(ray: &Ray, outward_normal: Vec3, material: &'a dyn Material) -> HitRecord<'a> {
        HitRecord::new(ray, 1.0, outward_normal, material)
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_straight_through() {
        let out = refract(-Vec3::Y, Vec3::Y, 1.0 / 1.5);
        assert!(approx_eq_vec(out, -Vec3::Y));
    }

    #[test]
    fn test_schlick_limits() {
        // Head-on glass reflects about 4%
        assert!((schlick(1.0, 1.5) - 0.04).abs() < 1e-9);
        // Grazing incidence reflects everything
        assert!((schlick(0.0, 1.5) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_lambertian_always_scatters_with_albedo() {
        let albedo = Color::new(0.8, 0.3, 0.1);
        let mat = Lambertian::new(albedo);
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let rec = record(&ray, Vec3::Y, &mat);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..1000 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("lambertian never absorbs");
            assert_eq!(result.attenuation, albedo);
            assert_eq!(result.scattered.origin(), rec.p);
            // normal + unit vector never points below the surface
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
        }
    }

    /// Generator that only yields zeros, which makes `random_unit_vector`
    /// return `-Z`.
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    #[test]
    fn test_lambertian_cancelled_direction_falls_back_to_normal() {
        let mat = Lambertian::new(Color::splat(0.5));
        let ray = Ray::new(Point3::new(0.0, 0.0, 1.0), -Vec3::Z);
        let rec = record(&ray, Vec3::Z, &mat);
        assert_eq!(random_unit_vector(&mut ZeroRng), -Vec3::Z);

        let result = mat.scatter(&ray, &rec, &mut ZeroRng).expect("lambertian never absorbs");
        assert_eq!(result.scattered.direction(), Vec3::Z);
    }

    #[test]
    fn test_lambertian_floor_radiance_is_bounded_by_albedo() {
        // Every path bounces off the floor once and escapes to a sky of at
        // most white, so the mean can not exceed the albedo
        let albedo = Color::new(0.9, 0.5, 0.2);
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(
            Point3::new(0.0, -1000.0, 0.0),
            1000.0,
            Lambertian::new(albedo),
        )));
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(12);

        let n = 20_000;
        let mut total = Color::ZERO;
        for _ in 0..n {
            total += ray_color(&ray, &world, 50, &mut rng);
        }
        let mean = total / n as f64;

        assert!(mean.x <= albedo.x && mean.y <= albedo.y && mean.z <= albedo.z, "{mean:?}");
        // Light does reach the camera
        assert!(mean.x > 0.0 && mean.y > 0.0 && mean.z > 0.0, "{mean:?}");
    }

    #[test]
    fn test_mirror_metal_reflects_exactly() {
        let mat = Metal::new(Color::new(0.7, 0.6, 0.5), 0.0);
        let ray = Ray::new(Point3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let rec = record(&ray, Vec3::Y, &mat);
        let mut rng = StdRng::seed_from_u64(13);

        let result = mat.scatter(&ray, &rec, &mut rng).expect("mirror reflects");
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!(approx_eq_vec(result.scattered.direction(), expected));
        assert_eq!(result.attenuation, Color::new(0.7, 0.6, 0.5));
    }

    #[test]
    fn test_fuzzy_metal_absorbs_below_surface() {
        // Almost grazing: heavy fuzz pushes some reflections into the surface
        let mat = Metal::new(Color::ONE, 1.0);
        let ray = Ray::new(Point3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0));
        let rec = record(&ray, Vec3::Y, &mat);
        let mut rng = StdRng::seed_from_u64(14);

        let mut absorbed = 0;
        for _ in 0..1000 {
            match mat.scatter(&ray, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(rec.normal) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz(), 0.0);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mat = Dielectric::new(1.5);
        // Inside the glass, travelling steeply against the outward normal +Y:
        // sin(theta) = 0.8 > 1 / 1.5
        let direction = Vec3::new(0.8, 0.6, 0.0);
        let ray = Ray::new(Point3::new(0.0, -1.0, 0.0), direction);
        let rec = record(&ray, Vec3::Y, &mat);
        assert!(!rec.front_face);

        let mut rng = StdRng::seed_from_u64(15);
        let mirror = reflect(direction.normalize(), rec.normal);
        for _ in 0..200 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("glass never absorbs");
            assert_eq!(result.attenuation, Color::ONE);
            assert!(approx_eq_vec(result.scattered.direction(), mirror));
        }
    }

    #[test]
    fn test_dielectric_mostly_refracts_head_on() {
        let mat = Dielectric::new(1.5);
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let rec = record(&ray, Vec3::Y, &mat);
        let mut rng = StdRng::seed_from_u64(16);

        let refracted = (0..1000)
            .filter_map(|_| mat.scatter(&ray, &rec, &mut rng))
            .filter(|r| r.scattered.direction().y < 0.0)
            .count();
        // Schlick gives ~4% reflection at normal incidence
        assert!(refracted > 900, "only {refracted} of 1000 refracted");
    }

    #[test]
    fn test_surface_material_dispatch() {
        let albedo = Color::new(0.2, 0.4, 0.6);
        let mat: SurfaceMaterial = Lambertian::new(albedo).into();
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let rec = record(&ray, Vec3::Y, &mat);
        let mut rng = StdRng::seed_from_u64(17);

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(result.attenuation, albedo);
    }
}
