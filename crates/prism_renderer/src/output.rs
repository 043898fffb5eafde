//! Image output.
//!
//! Turns the pipeline's unordered pixel sums into a finished image and
//! writes it as PNG (through the `image` crate) or plain-text PPM.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use prism_math::{Color, Interval};
use thiserror::Error;

use crate::Pixel;

/// Errors that can occur while assembling or writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("expected {expected} pixels, got {actual}")]
    PixelCount { expected: usize, actual: usize },

    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("pixel ({x}, {y}) was delivered twice")]
    DuplicatePixel { x: u32, y: u32 },
}

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Displayable range after tone mapping. Stays below 1 so the 8-bit scale
/// never overflows.
const DISPLAY_RANGE: Interval = Interval {
    min: 0.0,
    max: 0.999,
};

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Average a sample sum, gamma correct it and clamp it to the display range.
pub fn tone_map(sum: Color, samples_per_pixel: u32) -> Color {
    let scale = 1.0 / f64::from(samples_per_pixel.max(1));
    let c = sum * scale;
    Color::new(
        DISPLAY_RANGE.clamp(linear_to_gamma(c.x)),
        DISPLAY_RANGE.clamp(linear_to_gamma(c.y)),
        DISPLAY_RANGE.clamp(linear_to_gamma(c.z)),
    )
}

/// A finished image in row-major order, row 0 at the top.
///
/// Stores tone-mapped colors in `[0, 0.999]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    colors: Vec<Color>,
}

impl ImageBuffer {
    /// Reassemble pipeline output by position.
    ///
    /// Every position in the image must appear exactly once. Arrival order
    /// does not matter.
    pub fn from_pixels(
        width: u32,
        height: u32,
        pixels: &[Pixel],
        samples_per_pixel: u32,
    ) -> OutputResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(OutputError::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }

        let mut slots: Vec<Option<Color>> = vec![None; expected];
        for pixel in pixels {
            if pixel.x >= width || pixel.y >= height {
                return Err(OutputError::PixelOutOfBounds {
                    x: pixel.x,
                    y: pixel.y,
                    width,
                    height,
                });
            }

            let index = pixel.y as usize * width as usize + pixel.x as usize;
            if slots[index].is_some() {
                return Err(OutputError::DuplicatePixel {
                    x: pixel.x,
                    y: pixel.y,
                });
            }
            slots[index] = Some(tone_map(pixel.color, samples_per_pixel));
        }

        // Right count and no duplicates means every slot is filled
        let colors = slots.into_iter().flatten().collect();

        Ok(Self {
            width,
            height,
            colors,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tone-mapped color at column `x`, row `y` (row 0 at the top).
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.colors
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// 8-bit RGB bytes, row-major, scaled by 255.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.colors.len() * 3);
        for c in &self.colors {
            bytes.push((255.0 * c.x) as u8);
            bytes.push((255.0 * c.y) as u8);
            bytes.push((255.0 * c.z) as u8);
        }
        bytes
    }

    /// Write a plain-text `P3` PPM image, scaling each channel by 256.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> OutputResult<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for c in &self.colors {
            let r = (256.0 * c.x) as u32;
            let g = (256.0 * c.y) as u32;
            let b = (256.0 * c.z) as u32;
            writeln!(writer, "{} {} {}", r, g, b)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Save as PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> OutputResult<()> {
        let img = image::RgbImage::from_raw(self.width, self.height, self.to_rgb8()).ok_or(
            OutputError::PixelCount {
                expected: self.width as usize * self.height as usize,
                actual: self.colors.len(),
            },
        )?;
        img.save_with_format(path.as_ref(), image::ImageFormat::Png)?;
        Ok(())
    }

    /// Save as PPM.
    pub fn save_ppm<P: AsRef<Path>>(&self, path: P) -> OutputResult<()> {
        let file = File::create(path.as_ref())?;
        self.write_ppm(BufWriter::new(file))
    }

    /// Save to `path`, choosing the format from the extension: `.ppm` writes
    /// PPM, anything else PNG.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> OutputResult<()> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            self.save_ppm(path)?;
        } else {
            self.save_png(path)?;
        }

        info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}
