//! Scene assembly from descriptors.

use log::{info, warn};
use prism_core::{MaterialDescription, PrimitiveDescription};

use crate::{
    Dielectric, Hittable, HittableList, Lambertian, Metal, Rectangle, Sphere, SurfaceMaterial,
    Triangle,
};

/// Turn a material descriptor into a concrete material.
pub fn build_material(desc: &MaterialDescription) -> SurfaceMaterial {
    match *desc {
        MaterialDescription::Lambertian { albedo } => Lambertian::new(albedo.into()).into(),
        MaterialDescription::Metal { albedo, fuzz } => Metal::new(albedo.into(), fuzz).into(),
        MaterialDescription::Dielectric { refractive_index } => {
            Dielectric::new(refractive_index).into()
        }
    }
}

/// Turn a primitive descriptor into intersectable geometry.
pub fn build_primitive(desc: &PrimitiveDescription) -> Box<dyn Hittable> {
    let material = build_material(desc.material());

    match *desc {
        PrimitiveDescription::Sphere { center, radius, .. } => {
            Box::new(Sphere::new(center.into(), radius, material))
        }
        PrimitiveDescription::Triangle { v0, v1, v2, .. } => {
            Box::new(Triangle::new(v0.into(), v1.into(), v2.into(), material))
        }
        PrimitiveDescription::Rectangle { a, w, h, .. } => {
            Box::new(Rectangle::new(a.into(), w.into(), h.into(), material))
        }
    }
}

/// Assemble the world from validated primitive descriptors, in order.
pub fn build_world(primitives: &[PrimitiveDescription]) -> HittableList {
    let mut world = HittableList::new();
    for desc in primitives {
        world.add(build_primitive(desc));
    }

    if world.is_empty() {
        warn!("Scene is empty, every pixel will show the sky");
    } else {
        info!("Built scene with {} primitives", world.len());
    }

    world
}
