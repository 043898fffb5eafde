//! Concurrent pixel sampling pipeline.
//!
//! One filler task feeds every pixel coordinate into a bounded job queue.
//! A fixed pool of workers pulls jobs, samples the pixel and sends the
//! finished [`Pixel`] to an unbounded results channel. The calling thread
//! drains results until it holds exactly one per pixel.
//!
//! Completion order is whatever order the workers finish in. Consumers
//! reassemble the image by position.
//!
//! A worker that panics while sampling logs the failure and exits. Its pixel
//! never arrives, so once the survivors drain the queue the render ends with
//! [`RenderError::WorkerLost`].

use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, error, info};
use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::renderer::sample_pixel;
use crate::{Camera, Color, Hittable};

/// Job queue slots per worker.
const JOBS_PER_WORKER: usize = 10;

/// Pixels between progress callbacks.
const PROGRESS_INTERVAL: usize = 1000;

/// Errors that can occur while rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("result channel closed after {received} of {expected} pixels")]
    WorkerLost { received: usize, expected: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Image and sampling parameters for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Worker count. `None` uses the available hardware parallelism.
    pub workers: Option<usize>,
    /// Seeds the master generator that hands out one generator per worker.
    /// `None` takes a seed from the wall clock at render time.
    pub seed: Option<u64>,
}

impl RenderSettings {
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            samples_per_pixel: 100,
            max_depth: 50,
            workers: None,
            seed: None,
        }
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of pixels, and therefore jobs, in the image.
    pub fn pixel_count(&self) -> usize {
        self.image_width as usize * self.image_height as usize
    }

    /// Resolved worker count.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(RenderError::InvalidSettings(format!(
                "image must be at least 1x1, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSettings(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(RenderError::InvalidSettings(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(RenderError::InvalidSettings(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A pixel still to be sampled. `j` counts rows upwards from the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelJob {
    pub i: u32,
    pub j: u32,
}

/// A finished pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    /// Sum of all samples, not yet averaged or gamma corrected
    pub color: Color,
    /// Column, left to right
    pub x: u32,
    /// Row, with row 0 at the top of the image
    pub y: u32,
}

/// Snapshot of render progress handed to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    pub elapsed: Duration,
}

impl Progress {
    /// Completed share in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.done as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    /// Pixels per second so far.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.done as f64 / secs
        } else {
            0.0
        }
    }

    /// Estimated time remaining, once the rate is known.
    pub fn eta(&self) -> Option<Duration> {
        let rate = self.rate();
        if rate <= 0.0 {
            return None;
        }
        let remaining = self.total.saturating_sub(self.done) as f64;
        Some(Duration::from_secs_f64(remaining / rate))
    }

    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }
}

/// Render every pixel of the image, logging progress as it goes.
pub fn render(
    world: &dyn Hittable,
    camera: &Camera,
    settings: &RenderSettings,
) -> RenderResult<Vec<Pixel>> {
    let mut next_report = 0.1;
    render_with_progress(world, camera, settings, |progress| {
        if progress.fraction() >= next_report && !progress.is_complete() {
            info!(
                "{:5.1}% ({:.0} px/s, ETA {:.1}s)",
                progress.percent(),
                progress.rate(),
                progress.eta().map_or(0.0, |eta| eta.as_secs_f64())
            );
            while next_report <= progress.fraction() {
                next_report += 0.1;
            }
        }
    })
}

/// Render every pixel of the image, calling `on_progress` every few thousand
/// pixels and once more when the last pixel arrives.
///
/// Blocks until all `width * height` pixels have been collected.
pub fn render_with_progress<F>(
    world: &dyn Hittable,
    camera: &Camera,
    settings: &RenderSettings,
    mut on_progress: F,
) -> RenderResult<Vec<Pixel>>
where
    F: FnMut(&Progress),
{
    settings.validate()?;

    let workers = settings.worker_count();
    let total = settings.pixel_count();
    let seed = settings.seed.unwrap_or_else(prism_core::clock_seed);

    info!(
        "Rendering {}x{} @ {} spp, max depth {}, {} workers, seed {}",
        settings.image_width,
        settings.image_height,
        settings.samples_per_pixel,
        settings.max_depth,
        workers,
        seed
    );

    // One extra thread for the filler
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers + 1)
        .thread_name(|i| format!("prism-worker-{i}"))
        .build()?;

    let (job_tx, job_rx) = channel::bounded::<PixelJob>(workers * JOBS_PER_WORKER);
    let (result_tx, result_rx) = channel::unbounded::<Pixel>();

    let mut master = StdRng::seed_from_u64(seed);
    let seeds: Vec<u64> = (0..workers).map(|_| master.gen()).collect();

    let start = Instant::now();

    let pixels = pool.in_place_scope(|scope| {
        let (width, height) = (settings.image_width, settings.image_height);
        scope.spawn(move |_| fill_job_queue(job_tx, width, height));

        for (id, seed) in seeds.into_iter().enumerate() {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            let rng = SmallRng::seed_from_u64(seed);
            scope.spawn(move |_| pixel_worker(id, world, camera, settings, jobs, results, rng));
        }

        // Only the workers may keep these alive, so a dead pool disconnects
        drop(job_rx);
        drop(result_tx);

        collect_pixels(&result_rx, total, start, &mut on_progress)
    })?;

    info!("Rendered {} pixels in {:.2?}", pixels.len(), start.elapsed());
    Ok(pixels)
}

/// Queue every pixel, top row first. Stops early if every worker is gone.
fn fill_job_queue(jobs: Sender<PixelJob>, width: u32, height: u32) {
    for j in (0..height).rev() {
        for i in 0..width {
            if jobs.send(PixelJob { i, j }).is_err() {
                return;
            }
        }
    }
    // Dropping the sender closes the queue
}

fn pixel_worker(
    id: usize,
    world: &dyn Hittable,
    camera: &Camera,
    settings: &RenderSettings,
    jobs: Receiver<PixelJob>,
    results: Sender<Pixel>,
    mut rng: SmallRng,
) {
    debug!("worker {id} started");

    let mut count = 0usize;
    for job in jobs.iter() {
        let sampled = panic::catch_unwind(AssertUnwindSafe(|| {
            sample_pixel(
                camera,
                world,
                job.i,
                job.j,
                settings.image_width,
                settings.image_height,
                settings.samples_per_pixel,
                settings.max_depth,
                &mut rng,
            )
        }));
        let Ok(color) = sampled else {
            error!("worker {id} panicked on pixel ({}, {})", job.i, job.j);
            return;
        };

        let pixel = Pixel {
            color,
            x: job.i,
            y: settings.image_height - 1 - job.j,
        };
        if results.send(pixel).is_err() {
            break;
        }
        count += 1;
    }

    debug!("worker {id} finished after {count} pixels");
}

fn collect_pixels<F>(
    results: &Receiver<Pixel>,
    total: usize,
    start: Instant,
    on_progress: &mut F,
) -> RenderResult<Vec<Pixel>>
where
    F: FnMut(&Progress),
{
    let mut pixels = Vec::with_capacity(total);

    while pixels.len() < total {
        match results.recv() {
            Ok(pixel) => pixels.push(pixel),
            Err(_) => {
                return Err(RenderError::WorkerLost {
                    received: pixels.len(),
                    expected: total,
                })
            }
        }

        if pixels.len() % PROGRESS_INTERVAL == 0 || pixels.len() == total {
            on_progress(&Progress {
                done: pixels.len(),
                total,
                elapsed: start.elapsed(),
            });
        }
    }

    Ok(pixels)
}
