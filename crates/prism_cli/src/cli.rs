use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use prism_core::{RenderConfig, ScenePreset};

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliScene {
    /// Hundreds of small random spheres around three large ones
    Random,
    /// Five spheres including a hollow glass ball
    Demo,
    /// Mirror chessboard built from rectangles
    Chessboard,
}

impl From<CliScene> for ScenePreset {
    fn from(scene: CliScene) -> Self {
        match scene {
            CliScene::Random => ScenePreset::Random,
            CliScene::Demo => ScenePreset::Demo,
            CliScene::Chessboard => ScenePreset::Chessboard,
        }
    }
}

/// prism - a Monte Carlo path tracer
#[derive(Parser, Debug)]
#[command(
    name = "prism",
    version,
    about = "Render spheres, triangles and rectangles with a CPU path tracer",
    after_help = "EXAMPLES:\n  \
                  prism\n  \
                  prism scene.json -o scene.png\n  \
                  prism --scene demo -w 400 -s 50 -o demo.ppm\n  \
                  prism --scene chessboard --seed 7 --workers 4"
)]
pub struct Args {
    /// JSON render configuration. Built-in defaults are used when omitted.
    pub config: Option<PathBuf>,

    /// Output image path (.ppm for PPM, anything else for PNG)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Image width in pixels; the height follows the aspect ratio
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Samples per pixel
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(short, long)]
    pub depth: Option<u32>,

    /// Seed for scene generation and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of render workers (defaults to the available cores)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Render a built-in scene instead of the configured world
    #[arg(long, value_enum)]
    pub scene: Option<CliScene>,

    /// Set the logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command line overrides on top of a loaded config.
    pub fn apply(&self, config: &mut RenderConfig) {
        if let Some(output) = &self.output {
            config.file_name = output.clone();
        }
        if let Some(width) = self.width {
            config.img_width = width;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(scene) = self.scene {
            config.world.preset = Some(scene.into());
        }
    }
}
