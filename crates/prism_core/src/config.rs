//! Render configuration loading and validation.
//!
//! A config file is JSON. Every field is optional; missing fields fall back
//! to the defaults of the classic "random spheres" render. Validation runs
//! before any scene is built so a bad file fails before render work starts.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::description::{AnimationDescription, CameraDescription, PrimitiveDescription};
use crate::presets::{random_scene, ScenePreset};

/// Errors that can occur while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for `{field}`: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Seed taken from the wall clock, in nanoseconds since the Unix epoch.
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// What to put in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Generate the random sphere field. Overrides `static`.
    #[serde(default, alias = "Random")]
    pub random: bool,

    /// Use a built-in scene. Overrides both `random` and `static`.
    #[serde(default)]
    pub preset: Option<ScenePreset>,

    /// Explicit list of primitives.
    #[serde(default, rename = "static", alias = "Static")]
    pub static_primitives: Vec<PrimitiveDescription>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            random: true,
            preset: None,
            static_primitives: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Resolve the world into a concrete list of primitives.
    ///
    /// `rng` is only consumed by generated scenes.
    pub fn primitives<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<PrimitiveDescription> {
        if let Some(preset) = self.preset {
            return preset.build(rng);
        }
        if self.random {
            return random_scene(rng);
        }
        self.static_primitives.clone()
    }

    pub fn validate(&self, path: &str) -> ConfigResult<()> {
        // Static primitives are checked even when a generated scene wins, so a
        // broken file never slips through just because `random` is set.
        for (i, primitive) in self.static_primitives.iter().enumerate() {
            primitive.validate(&format!("{path}.static[{i}]"))?;
        }
        if !self.random && self.preset.is_none() && self.static_primitives.is_empty() {
            log::warn!("World is empty, only the sky will be rendered");
        }
        Ok(())
    }
}

/// Complete description of a render job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output image path. The extension picks the encoder (`.ppm` or PNG).
    #[serde(alias = "FileName")]
    pub file_name: PathBuf,

    /// Image width in pixels
    #[serde(alias = "ImgWidth")]
    pub img_width: u32,

    /// Width / height, e.g. 16:9 is 1.777...
    #[serde(alias = "Aspect")]
    pub aspect: f64,

    #[serde(alias = "SamplesPerPixel")]
    pub samples_per_pixel: u32,

    /// Maximum number of bounces per path
    #[serde(alias = "MaxDepth")]
    pub max_depth: u32,

    /// Seed for scene generation and sampling. Wall clock when absent.
    #[serde(alias = "Seed")]
    pub seed: Option<u64>,

    /// Worker thread count. Available parallelism when absent.
    #[serde(alias = "Workers")]
    pub workers: Option<usize>,

    #[serde(alias = "Camera")]
    pub camera: CameraDescription,

    #[serde(alias = "Animation")]
    pub animation: AnimationDescription,

    #[serde(alias = "World")]
    pub world: WorldConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            file_name: PathBuf::from("render.png"),
            img_width: 380,
            aspect: 16.0 / 9.0,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: None,
            workers: None,
            camera: CameraDescription::default(),
            animation: AnimationDescription::default(),
            world: WorldConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Load and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        log::debug!("Loading config from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Image height derived from the width and aspect ratio (truncated).
    pub fn image_height(&self) -> u32 {
        (f64::from(self.img_width) / self.aspect) as u32
    }

    /// Aspect ratio of the actual pixel grid, which the camera must use so
    /// that truncating the height does not stretch the image.
    pub fn pixel_aspect_ratio(&self) -> f64 {
        f64::from(self.img_width) / f64::from(self.image_height())
    }

    /// The configured seed, or one derived from the wall clock.
    pub fn seed_or_clock(&self) -> u64 {
        self.seed.unwrap_or_else(clock_seed)
    }

    /// Output path for an animation frame: `<stem>_<frame:04>.<ext>`.
    ///
    /// Stills use `file_name` unchanged.
    pub fn frame_path(&self, frame: u32) -> PathBuf {
        if !self.animation.enabled {
            return self.file_name.clone();
        }
        let stem = self
            .file_name
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("frame");
        let name = match self.file_name.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}_{frame:04}.{ext}"),
            None => format!("{stem}_{frame:04}"),
        };
        self.file_name.with_file_name(name)
    }

    /// Check every field. Runs automatically from [`RenderConfig::load`].
    pub fn validate(&self) -> ConfigResult<()> {
        if self.img_width == 0 {
            return Err(ConfigError::invalid("img_width", "must be at least 1"));
        }
        if !(self.aspect.is_finite() && self.aspect > 0.0) {
            return Err(ConfigError::invalid(
                "aspect",
                format!("must be positive, got {}", self.aspect),
            ));
        }
        if self.image_height() == 0 {
            return Err(ConfigError::invalid(
                "aspect",
                format!(
                    "width {} at aspect {} gives an image with no rows",
                    self.img_width, self.aspect
                ),
            ));
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::invalid("samples_per_pixel", "must be at least 1"));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::invalid("max_depth", "must be at least 1"));
        }
        if self.workers == Some(0) {
            return Err(ConfigError::invalid("workers", "must be at least 1"));
        }
        if self.file_name.as_os_str().is_empty() {
            return Err(ConfigError::invalid("file_name", "must not be empty"));
        }
        self.camera.validate("camera")?;
        self.animation.validate("animation")?;
        self.world.validate("world")
    }
}
