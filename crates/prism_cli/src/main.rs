//! `prism` - render a scene description to an image.
//!
//! Loads a JSON config (or the built-in defaults), applies command line
//! overrides, builds the world once and renders one still or a turntable
//! animation frame by frame.

mod cli;
mod logger;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use prism_core::RenderConfig;
use prism_renderer::{
    build_world, render_with_progress, Camera, HittableList, ImageBuffer, Progress,
    RenderSettings,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_logger(args.log_level.into());

    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    args.apply(&mut config);
    config.validate().context("Invalid render settings")?;

    let seed = config.seed_or_clock();
    info!("Seed: {seed} (pass --seed {seed} to reproduce)");

    let primitives = config.world.primitives(&mut StdRng::seed_from_u64(seed));
    let world = build_world(&primitives);

    let frames = config.animation.frame_count();
    if frames > 1 {
        info!("Rendering {frames} animation frames");
    }

    let start = Instant::now();
    for frame in 0..frames {
        render_frame(&config, &world, seed, frame)
            .with_context(|| format!("Failed to render frame {frame}"))?;
    }

    info!("Done in {:.2?}", start.elapsed());
    Ok(())
}

fn render_frame(config: &RenderConfig, world: &HittableList, seed: u64, frame: u32) -> Result<()> {
    let camera_desc = config.camera.orbit(config.animation.frame_angle(frame));
    let camera = Camera::from_description(&camera_desc, config.pixel_aspect_ratio());

    let settings = RenderSettings {
        image_width: config.img_width,
        image_height: config.image_height(),
        samples_per_pixel: config.samples_per_pixel,
        max_depth: config.max_depth,
        workers: config.workers,
        // Decorrelate the noise between frames
        seed: Some(seed.wrapping_add(u64::from(frame))),
    };

    let mut next_report = 0.1;
    let pixels = render_with_progress(world, &camera, &settings, |progress| {
        if progress.fraction() >= next_report || progress.is_complete() {
            log_progress(progress);
            while next_report <= progress.fraction() {
                next_report += 0.1;
            }
        }
    })?;

    let image = ImageBuffer::from_pixels(
        settings.image_width,
        settings.image_height,
        &pixels,
        settings.samples_per_pixel,
    )?;

    let path = config.frame_path(frame);
    image
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn log_progress(progress: &Progress) {
    match progress.eta() {
        Some(eta) if !progress.is_complete() => info!(
            "{:5.1}% | {:.0} px/s | elapsed {:.1}s | ETA {:.1}s",
            progress.percent(),
            progress.rate(),
            progress.elapsed.as_secs_f64(),
            eta.as_secs_f64()
        ),
        _ => info!(
            "{:5.1}% | {:.0} px/s | elapsed {:.1}s",
            progress.percent(),
            progress.rate(),
            progress.elapsed.as_secs_f64()
        ),
    }
}
