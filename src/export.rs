//! Turning a canvas into pixels a person can look at.  Every pixel
//! already stores the average color plotted into it, so that average
//! is used as-is; it is never divided by the hit count again.
//! Untouched pixels are black.

use image::{ImageBuffer, RgbImage};
use num::clamp;
use std::path::Path;
use std::str::FromStr;

use crate::canvas::{Canvas, Pixel};
use crate::errors::RenderError;

/// How hit counts affect brightness.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Tone {
    /// Each touched pixel shows its average color, however often it
    /// was hit.
    Mean,
    /// The average color scaled by ln(1 + hits) / ln(1 + max hits), so
    /// dense regions are bright and rarely visited ones fade out.
    Density,
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Tone, String> {
        match s {
            "mean" => Ok(Tone::Mean),
            "density" => Ok(Tone::Density),
            _ => Err(format!("unknown tone '{}'; expected mean or density", s)),
        }
    }
}

fn shade(pixel: &Pixel, tone: Tone, log_max: f64) -> [u8; 3] {
    let color = match pixel.color() {
        Some(color) => color,
        None => return [0, 0, 0],
    };
    let scale = match tone {
        Tone::Mean => 1.0,
        Tone::Density if log_max > 0.0 => (1.0 + pixel.hits as f64).ln() / log_max,
        Tone::Density => 0.0,
    };
    let channel = |v: f64| clamp(v * scale, 0.0, 255.0).round() as u8;
    [channel(color.r), channel(color.g), channel(color.b)]
}

/// Shade every pixel of the canvas into an 8-bit RGB image.  Row 0 of
/// the canvas is the top row of the image.
pub fn to_image(canvas: &Canvas, tone: Tone) -> Result<RgbImage, RenderError> {
    let log_max = (1.0 + canvas.max_hits() as f64).ln();
    let raw: Vec<u8> = canvas
        .pixels()
        .iter()
        .flat_map(|p| shade(p, tone, log_max).to_vec())
        .collect();
    ImageBuffer::from_raw(canvas.width() as u32, canvas.height() as u32, raw).ok_or_else(|| {
        RenderError::Image(format!(
            "buffer does not fit {}x{}",
            canvas.width(),
            canvas.height()
        ))
    })
}

/// Shade the canvas and write it to `path`.  The format follows the
/// file extension (png, ppm, bmp, ...).
pub fn write_image<P: AsRef<Path>>(path: P, canvas: &Canvas, tone: Tone) -> Result<(), RenderError> {
    let image = to_image(canvas, tone)?;
    image
        .save(path.as_ref())
        .map_err(|e| RenderError::Image(format!("{}: {}", path.as_ref().display(), e)))
}
