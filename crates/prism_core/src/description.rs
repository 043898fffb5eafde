//! Scene descriptor types.
//!
//! These map one-to-one onto the JSON scene format. Each descriptor is a
//! plain value; the renderer is responsible for turning them into
//! intersectable geometry once validation has passed.

use prism_math::{DQuat, Point3, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigResult};

/// A 3-component vector as it appears in scene files.
///
/// Accepts both the object form `{"x": 1, "y": 2, "z": 3}` and the array
/// form `[1, 2, 3]`. Always serializes as the object form.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "VectorRepr")]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VectorRepr {
    Object { x: f64, y: f64, z: f64 },
    Array([f64; 3]),
}

impl From<VectorRepr> for Vector {
    fn from(repr: VectorRepr) -> Self {
        match repr {
            VectorRepr::Object { x, y, z } => Vector { x, y, z },
            VectorRepr::Array([x, y, z]) => Vector { x, y, z },
        }
    }
}

impl Vector {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<Vector> for Vec3 {
    fn from(v: Vector) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vector {
    fn from(v: Vec3) -> Self {
        Vector::new(v.x, v.y, v.z)
    }
}

fn check_finite(v: &Vector, field: &str) -> ConfigResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "components must be finite numbers"))
    }
}

/// Surface material of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MaterialDescription {
    /// Diffuse surface.
    Lambertian { albedo: Vector },
    /// Reflective surface. `fuzz` is the roughness in `[0, 1]`.
    Metal {
        albedo: Vector,
        #[serde(default)]
        fuzz: f64,
    },
    /// Refractive surface such as glass (`1.5`) or diamond (`2.4`).
    Dielectric {
        #[serde(alias = "refindex", alias = "ref_index", alias = "RefIndex")]
        refractive_index: f64,
    },
}

impl MaterialDescription {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MaterialDescription::Lambertian { .. } => "lambertian",
            MaterialDescription::Metal { .. } => "metal",
            MaterialDescription::Dielectric { .. } => "dielectric",
        }
    }

    /// Check the material parameters. `path` prefixes field names in errors.
    pub fn validate(&self, path: &str) -> ConfigResult<()> {
        match *self {
            MaterialDescription::Lambertian { albedo } => {
                check_finite(&albedo, &format!("{path}.albedo"))
            }
            MaterialDescription::Metal { albedo, fuzz } => {
                check_finite(&albedo, &format!("{path}.albedo"))?;
                if !(0.0..=1.0).contains(&fuzz) {
                    return Err(ConfigError::invalid(
                        format!("{path}.fuzz"),
                        format!("must be within [0, 1], got {fuzz}"),
                    ));
                }
                Ok(())
            }
            MaterialDescription::Dielectric { refractive_index } => {
                if !(refractive_index.is_finite() && refractive_index > 0.0) {
                    return Err(ConfigError::invalid(
                        format!("{path}.refractive_index"),
                        format!("must be a positive number, got {refractive_index}"),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// A geometric primitive together with its material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PrimitiveDescription {
    /// A negative radius is legal and flips the normal, which is how hollow
    /// glass shells are built.
    Sphere {
        center: Vector,
        radius: f64,
        #[serde(alias = "mat")]
        material: MaterialDescription,
    },
    /// Vertices in counter-clockwise order when viewed from the front.
    Triangle {
        v0: Vector,
        v1: Vector,
        v2: Vector,
        #[serde(alias = "mat")]
        material: MaterialDescription,
    },
    /// `a` and `w` are the two corners of the base edge, `h` is the edge
    /// vector added to both to reach the opposite side. Nothing forces `h`
    /// to be perpendicular to `w - a`, so parallelograms are allowed.
    Rectangle {
        a: Vector,
        w: Vector,
        h: Vector,
        #[serde(alias = "mat")]
        material: MaterialDescription,
    },
}

impl PrimitiveDescription {
    /// Convenience constructor for the most common primitive.
    pub fn sphere(center: Point3, radius: f64, material: MaterialDescription) -> Self {
        PrimitiveDescription::Sphere {
            center: center.into(),
            radius,
            material,
        }
    }

    pub fn triangle(v0: Point3, v1: Point3, v2: Point3, material: MaterialDescription) -> Self {
        PrimitiveDescription::Triangle {
            v0: v0.into(),
            v1: v1.into(),
            v2: v2.into(),
            material,
        }
    }

    pub fn rectangle(a: Point3, w: Point3, h: Vec3, material: MaterialDescription) -> Self {
        PrimitiveDescription::Rectangle {
            a: a.into(),
            w: w.into(),
            h: h.into(),
            material,
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PrimitiveDescription::Sphere { .. } => "sphere",
            PrimitiveDescription::Triangle { .. } => "triangle",
            PrimitiveDescription::Rectangle { .. } => "rectangle",
        }
    }

    pub fn material(&self) -> &MaterialDescription {
        match self {
            PrimitiveDescription::Sphere { material, .. }
            | PrimitiveDescription::Triangle { material, .. }
            | PrimitiveDescription::Rectangle { material, .. } => material,
        }
    }

    /// Check the geometry and the material. `path` prefixes field names in errors.
    ///
    /// Degenerate triangles and rectangles are accepted; they simply never
    /// report a hit.
    pub fn validate(&self, path: &str) -> ConfigResult<()> {
        match self {
            PrimitiveDescription::Sphere { center, radius, .. } => {
                check_finite(center, &format!("{path}.center"))?;
                if !radius.is_finite() || *radius == 0.0 {
                    return Err(ConfigError::invalid(
                        format!("{path}.radius"),
                        format!("must be a non-zero number, got {radius}"),
                    ));
                }
            }
            PrimitiveDescription::Triangle { v0, v1, v2, .. } => {
                check_finite(v0, &format!("{path}.v0"))?;
                check_finite(v1, &format!("{path}.v1"))?;
                check_finite(v2, &format!("{path}.v2"))?;
            }
            PrimitiveDescription::Rectangle { a, w, h, .. } => {
                check_finite(a, &format!("{path}.a"))?;
                check_finite(w, &format!("{path}.w"))?;
                check_finite(h, &format!("{path}.h"))?;
            }
        }
        self.material().validate(&format!("{path}.mat"))
    }
}

/// Camera placement and lens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    #[serde(alias = "LookFrom")]
    pub look_from: Vector,
    #[serde(alias = "LookAt")]
    pub look_at: Vector,
    #[serde(alias = "Vup")]
    pub vup: Vector,
    /// Vertical field of view in degrees.
    #[serde(alias = "VFOV")]
    pub vfov: f64,
    /// Lens diameter. Zero disables depth of field.
    #[serde(alias = "Aperture")]
    pub aperture: f64,
    /// Distance from `look_from` to the plane of perfect focus.
    #[serde(alias = "FocusDist")]
    pub focus_dist: f64,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            look_from: Vector::new(13.0, 2.0, 3.0),
            look_at: Vector::new(0.0, 0.0, 0.0),
            vup: Vector::new(0.0, 1.0, 0.0),
            vfov: 20.0,
            aperture: 0.1,
            focus_dist: 10.0,
        }
    }
}

impl CameraDescription {
    pub fn validate(&self, path: &str) -> ConfigResult<()> {
        check_finite(&self.look_from, &format!("{path}.look_from"))?;
        check_finite(&self.look_at, &format!("{path}.look_at"))?;
        check_finite(&self.vup, &format!("{path}.vup"))?;

        if self.look_from == self.look_at {
            return Err(ConfigError::invalid(
                format!("{path}.look_at"),
                "must differ from look_from",
            ));
        }
        let view = Vec3::from(self.look_from) - Vec3::from(self.look_at);
        if Vec3::from(self.vup).cross(view).length_squared() == 0.0 {
            return Err(ConfigError::invalid(
                format!("{path}.vup"),
                "must be non-zero and not parallel to the view direction",
            ));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(ConfigError::invalid(
                format!("{path}.vfov"),
                format!("must be within (0, 180) degrees, got {}", self.vfov),
            ));
        }
        if !(self.aperture.is_finite() && self.aperture >= 0.0) {
            return Err(ConfigError::invalid(
                format!("{path}.aperture"),
                format!("must be zero or positive, got {}", self.aperture),
            ));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return Err(ConfigError::invalid(
                format!("{path}.focus_dist"),
                format!("must be positive, got {}", self.focus_dist),
            ));
        }
        Ok(())
    }

    /// Rotate `look_from` about the `vup` axis through `look_at`.
    ///
    /// Everything else about the camera is unchanged.
    pub fn orbit(&self, angle: f64) -> CameraDescription {
        let pivot = Vec3::from(self.look_at);
        let axis = Vec3::from(self.vup).normalize();
        let offset = Vec3::from(self.look_from) - pivot;
        let rotated = DQuat::from_axis_angle(axis, angle) * offset;

        CameraDescription {
            look_from: (pivot + rotated).into(),
            ..*self
        }
    }
}

/// Turntable animation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationDescription {
    #[serde(alias = "Enabled")]
    pub enabled: bool,
    /// Frames per second
    #[serde(alias = "Fps")]
    pub fps: u32,
    /// Length in seconds
    #[serde(alias = "Duration")]
    pub duration: u32,
}

impl Default for AnimationDescription {
    fn default() -> Self {
        Self {
            enabled: false,
            fps: 24,
            duration: 2,
        }
    }
}

impl AnimationDescription {
    /// Number of frames to render. A still image is one frame.
    pub fn frame_count(&self) -> u32 {
        if self.enabled {
            self.fps.saturating_mul(self.duration)
        } else {
            1
        }
    }

    /// Orbit angle in radians for `frame`. Frame 0 is the configured camera.
    pub fn frame_angle(&self, frame: u32) -> f64 {
        let frames = self.frame_count();
        if frames <= 1 {
            return 0.0;
        }
        std::f64::consts::TAU * f64::from(frame) / f64::from(frames)
    }

    pub fn validate(&self, path: &str) -> ConfigResult<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.fps == 0 {
            return Err(ConfigError::invalid(format!("{path}.fps"), "must be at least 1"));
        }
        if self.duration == 0 {
            return Err(ConfigError::invalid(
                format!("{path}.duration"),
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_math::approx_eq_vec;

    #[test]
    fn test_vector_object_and_array_forms() {
        let object: Vector = serde_json::from_str(r#"{"x": 1, "y": 2.5, "z": -3}"#).unwrap();
        let array: Vector = serde_json::from_str("[1, 2.5, -3]").unwrap();

        assert_eq!(object, Vector::new(1.0, 2.5, -3.0));
        assert_eq!(object, array);
    }

    #[test]
    fn test_vector_serializes_as_object() {
        let json = serde_json::to_string(&Vector::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(json, r#"{"x":1.0,"y":2.0,"z":3.0}"#);
    }

    #[test]
    fn test_primitive_with_original_keys() {
        let json = r#"{
            "type": "rectangle",
            "a": {"x": -8, "y": 0, "z": -8},
            "w": {"x": -7.5, "y": 0, "z": -8},
            "h": {"x": 0, "y": 0, "z": 0.5},
            "mat": {"type": "metal", "albedo": {"x": 1, "y": 1, "z": 1}, "fuzz": 0}
        }"#;
        let primitive: PrimitiveDescription = serde_json::from_str(json).unwrap();

        assert_eq!(primitive.kind(), "rectangle");
        assert_eq!(primitive.material().kind(), "metal");
    }

    #[test]
    fn test_dielectric_refindex_alias() {
        let material: MaterialDescription =
            serde_json::from_str(r#"{"type": "dielectric", "refindex": 1.5}"#).unwrap();

        assert_eq!(
            material,
            MaterialDescription::Dielectric {
                refractive_index: 1.5
            }
        );
    }

    #[test]
    fn test_unknown_material_is_rejected() {
        let result: Result<MaterialDescription, _> =
            serde_json::from_str(r#"{"type": "plastic", "albedo": [1, 1, 1]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_primitive_is_rejected() {
        let json = r#"{"type": "torus", "center": [0, 0, 0], "mat": {"type": "dielectric", "refindex": 1.5}}"#;
        let result: Result<PrimitiveDescription, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_metal_fuzz_out_of_range() {
        let material = MaterialDescription::Metal {
            albedo: Vector::new(0.8, 0.8, 0.8),
            fuzz: 1.5,
        };
        let err = material.validate("mat").unwrap_err();
        assert!(err.to_string().contains("mat.fuzz"));
    }

    #[test]
    fn test_dielectric_ior_must_be_positive() {
        let material = MaterialDescription::Dielectric {
            refractive_index: 0.0,
        };
        assert!(material.validate("mat").is_err());
    }

    #[test]
    fn test_negative_radius_is_valid() {
        let shell = PrimitiveDescription::sphere(
            Point3::new(-1.0, 0.0, -1.0),
            -0.45,
            MaterialDescription::Dielectric {
                refractive_index: 1.5,
            },
        );
        assert!(shell.validate("world.static[0]").is_ok());
    }

    #[test]
    fn test_zero_radius_is_invalid() {
        let sphere = PrimitiveDescription::sphere(
            Point3::ZERO,
            0.0,
            MaterialDescription::Lambertian {
                albedo: Vector::new(0.5, 0.5, 0.5),
            },
        );
        let err = sphere.validate("world.static[2]").unwrap_err();
        assert!(err.to_string().contains("world.static[2].radius"));
    }

    #[test]
    fn test_camera_validation() {
        assert!(CameraDescription::default().validate("camera").is_ok());

        let same_point = CameraDescription {
            look_at: Vector::new(13.0, 2.0, 3.0),
            ..CameraDescription::default()
        };
        assert!(same_point.validate("camera").is_err());

        let bad_fov = CameraDescription {
            vfov: 180.0,
            ..CameraDescription::default()
        };
        assert!(bad_fov.validate("camera").is_err());
    }

    #[test]
    fn test_orbit_keeps_distance_and_height() {
        let camera = CameraDescription::default();
        let pivot = Vec3::from(camera.look_at);
        let before = Vec3::from(camera.look_from);

        let quarter = camera.orbit(std::f64::consts::FRAC_PI_2);
        let after = Vec3::from(quarter.look_from);

        assert!(((after - pivot).length() - (before - pivot).length()).abs() < 1e-9);
        assert!((after.y - before.y).abs() < 1e-9);
        assert_eq!(quarter.look_at, camera.look_at);

        let full = camera.orbit(std::f64::consts::TAU);
        assert!(approx_eq_vec(Vec3::from(full.look_from), before));
    }

    #[test]
    fn test_frame_count() {
        let still = AnimationDescription::default();
        assert_eq!(still.frame_count(), 1);
        assert_eq!(still.frame_angle(0), 0.0);

        let animation = AnimationDescription {
            enabled: true,
            fps: 10,
            duration: 3,
        };
        assert_eq!(animation.frame_count(), 30);
        assert!((animation.frame_angle(15) - std::f64::consts::PI).abs() < 1e-12);
    }
}
