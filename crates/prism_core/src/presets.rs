//! Built-in scenes.
//!
//! Each preset produces a plain list of primitive descriptors, the same
//! thing a config file's `world.static` array holds.

use prism_math::{Color, Point3, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::description::{MaterialDescription, PrimitiveDescription};

/// Available built-in scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenePreset {
    /// Large field of small random spheres around three feature spheres.
    Random,
    /// Five spheres: diffuse, metal, a hollow glass ball and the ground.
    Demo,
    /// Black and white mirror tiles with three spheres on top.
    Chessboard,
}

impl ScenePreset {
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Vec<PrimitiveDescription> {
        match self {
            ScenePreset::Random => random_scene(rng),
            ScenePreset::Demo => demo_scene(),
            ScenePreset::Chessboard => chessboard_scene(Point3::new(-8.0, 0.0, -8.0), 16.0, 16.0),
        }
    }
}

fn lambertian(albedo: Color) -> MaterialDescription {
    MaterialDescription::Lambertian {
        albedo: albedo.into(),
    }
}

fn metal(albedo: Color, fuzz: f64) -> MaterialDescription {
    MaterialDescription::Metal {
        albedo: albedo.into(),
        fuzz,
    }
}

fn glass() -> MaterialDescription {
    MaterialDescription::Dielectric {
        refractive_index: 1.5,
    }
}

fn random_color<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> Color {
    Color::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}

/// The classic cover scene: a 22x22 grid of jittered small spheres.
pub fn random_scene<R: Rng + ?Sized>(rng: &mut R) -> Vec<PrimitiveDescription> {
    let mut world = Vec::with_capacity(4 + 22 * 22);

    // Ground
    world.push(PrimitiveDescription::sphere(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        lambertian(Color::new(0.5, 0.5, 0.5)),
    ));

    let keep_clear = Point3::new(4.0, 0.2, 0.0);
    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f64 = rng.gen();
            let center = Point3::new(
                f64::from(a) + 0.9 * rng.gen::<f64>(),
                0.2,
                f64::from(b) + 0.9 * rng.gen::<f64>(),
            );

            if (center - keep_clear).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                // Diffuse
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                lambertian(albedo)
            } else if choose_mat < 0.95 {
                let albedo = random_color(rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                metal(albedo, fuzz)
            } else {
                glass()
            };
            world.push(PrimitiveDescription::sphere(center, 0.2, material));
        }
    }

    world.push(PrimitiveDescription::sphere(
        Point3::new(0.0, 1.0, 0.0),
        1.0,
        glass(),
    ));
    world.push(PrimitiveDescription::sphere(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    ));
    world.push(PrimitiveDescription::sphere(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        metal(Color::new(0.7, 0.6, 0.5), 0.0),
    ));

    world
}

/// Small fixed scene, handy for quick previews with the camera at the origin.
pub fn demo_scene() -> Vec<PrimitiveDescription> {
    vec![
        PrimitiveDescription::sphere(
            Point3::new(0.0, 0.0, -1.0),
            0.5,
            lambertian(Color::new(0.1, 0.2, 0.5)),
        ),
        PrimitiveDescription::sphere(
            Point3::new(0.0, -100.5, -1.0),
            100.0,
            lambertian(Color::new(0.8, 0.8, 0.0)),
        ),
        PrimitiveDescription::sphere(
            Point3::new(1.0, 0.0, -1.0),
            0.5,
            metal(Color::new(0.8, 0.6, 0.2), 0.0),
        ),
        // Hollow glass: the inner sphere has a negative radius so its
        // normals point inward.
        PrimitiveDescription::sphere(Point3::new(-1.0, 0.0, -1.0), 0.5, glass()),
        PrimitiveDescription::sphere(Point3::new(-1.0, 0.0, -1.0), -0.45, glass()),
    ]
}

/// A board of `0.5` unit mirror tiles starting at `origin` and spanning
/// `width` along x and `length` along z, plus three spheres resting on it.
pub fn chessboard_scene(origin: Point3, width: f64, length: f64) -> Vec<PrimitiveDescription> {
    const SQUARE: f64 = 0.5;

    let mut board = Vec::new();
    let mut row_white = true;
    let mut z = origin.z;
    while z < origin.z + length {
        let mut white = row_white;
        let mut x = origin.x;
        while x < origin.x + width {
            let shade = if white { 1.0 } else { 0.0 };
            board.push(PrimitiveDescription::rectangle(
                Point3::new(x, origin.y, z),
                Point3::new(x + SQUARE, origin.y, z),
                Vec3::new(0.0, 0.0, SQUARE),
                metal(Color::splat(shade), 0.0),
            ));
            white = !white;
            x += SQUARE;
        }
        row_white = !row_white;
        z += SQUARE;
    }

    board.push(PrimitiveDescription::sphere(
        Point3::new(0.0, 0.5, -1.0),
        0.5,
        lambertian(Color::new(0.1, 0.2, 0.5)),
    ));
    board.push(PrimitiveDescription::sphere(
        Point3::new(1.0, 0.5, -1.0),
        0.5,
        metal(Color::new(0.8, 0.6, 0.2), 0.0),
    ));
    board.push(PrimitiveDescription::sphere(
        Point3::new(-1.0, 0.5, -1.0),
        0.5,
        glass(),
    ));

    board
}
