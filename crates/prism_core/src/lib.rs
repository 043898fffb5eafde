//! Prism Core - scene descriptions and render configuration.
//!
//! This crate provides:
//!
//! - **Descriptors**: serde types for primitives, materials, camera and animation
//! - **Configuration**: JSON render config loading with fail-fast validation
//! - **Presets**: built-in scenes (the random sphere field, a small demo scene
//!   and a chessboard made of rectangles)
//!
//! Nothing here traces rays. The renderer turns a validated list of
//! [`PrimitiveDescription`]s into intersectable geometry.
//!
//! # Example
//!
//! ```ignore
//! use prism_core::RenderConfig;
//!
//! let config = RenderConfig::load("scene.json")?;
//! println!("{}x{} @ {} spp", config.img_width, config.image_height(), config.samples_per_pixel);
//! ```

pub mod config;
pub mod description;
pub mod presets;

pub use config::{clock_seed, ConfigError, ConfigResult, RenderConfig, WorldConfig};
pub use description::{
    AnimationDescription, CameraDescription, MaterialDescription, PrimitiveDescription, Vector,
};
pub use presets::{chessboard_scene, demo_scene, random_scene, ScenePreset};
