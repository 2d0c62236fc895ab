//! Pixel transforms applied to digit images and whole canvases.
//!
//! The composer always applies [`invert`], [`normalize`], and
//! [`resize_width`]. Callers may add their own [`Transform`]s, such as
//! [`Blur`] or [`Distort`], which run per digit or over the finished canvas
//! depending on the spacing policy.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};
use rand::Rng;

use crate::grid::{Canvas, DigitImage, Grid};

/// A canvas in the layout `image` operates on.
type LumaCanvas = ImageBuffer<Luma<f32>, Vec<f32>>;

/// A caller-supplied image operation.
///
/// Closures of type `FnMut(Canvas) -> Canvas` implement this trait.
pub trait Transform {
    /// Transforms `image`, returning the result.
    fn apply(&mut self, image: Canvas) -> Canvas;
}

impl<F> Transform for F
where
    F: FnMut(Canvas) -> Canvas,
{
    fn apply(&mut self, image: Canvas) -> Canvas {
        self(image)
    }
}

/// Replaces every intensity `v` with `max - v`.
#[must_use]
pub fn invert(image: &DigitImage, max: u8) -> DigitImage {
    image.map(|value| max.saturating_sub(value))
}

/// Scales intensities onto `[0, 1]` by dividing by `max`.
#[must_use]
pub fn normalize(image: &DigitImage, max: u8) -> Canvas {
    if max == 0 {
        return image.map(|_| 0.0);
    }
    let scale = f32::from(max);
    image.map(|value| f32::from(value) / scale)
}

/// Resamples `image` to `width` columns with a triangle (linear) filter.
///
/// The height is unchanged. Returns a clone when the width already matches.
/// Intensities are expected on `[0, 1]`, the range of a normalized canvas.
///
/// # Examples
/// ```
/// use digitstrip_core::{Grid, resize_width};
///
/// let image = Grid::filled(4, 2, 0.5_f32);
/// let resized = resize_width(&image, 7);
/// assert_eq!((resized.width(), resized.height()), (7, 2));
/// assert!(resized.as_slice().iter().all(|v| (v - 0.5).abs() < 1e-6));
/// ```
#[must_use]
pub fn resize_width(image: &Canvas, width: usize) -> Canvas {
    let height = image.height();
    if width == image.width() {
        return image.clone();
    }
    if image.width() == 0 || width == 0 || height == 0 {
        return Grid::filled(width, height, 0.0);
    }
    u32::try_from(width)
        .ok()
        .zip(to_luma(image))
        .and_then(|(columns, buffer)| {
            from_luma(imageops::resize(
                &buffer,
                columns,
                buffer.height(),
                FilterType::Triangle,
            ))
        })
        .unwrap_or_else(|| Grid::filled(width, height, 0.0))
}

/// Gaussian blur over the whole image, edges clamped.
#[derive(Clone, Copy, Debug)]
pub struct Blur {
    /// Standard deviation in pixels. Non-positive values disable the blur.
    pub sigma: f32,
}

impl Transform for Blur {
    fn apply(&mut self, image: Canvas) -> Canvas {
        if self.sigma <= 0.0 || image.width() == 0 || image.height() == 0 {
            return image;
        }
        match to_luma(&image).and_then(|buffer| from_luma(imageops::blur(&buffer, self.sigma))) {
            Some(blurred) => blurred,
            None => image,
        }
    }
}

fn to_luma(image: &Canvas) -> Option<LumaCanvas> {
    let width = u32::try_from(image.width()).ok()?;
    let height = u32::try_from(image.height()).ok()?;
    ImageBuffer::from_raw(width, height, image.as_slice().to_vec())
}

fn from_luma(buffer: LumaCanvas) -> Option<Canvas> {
    let (width, height) = buffer.dimensions();
    let width = usize::try_from(width).ok()?;
    let height = usize::try_from(height).ok()?;
    Grid::from_vec(width, height, buffer.into_raw()).ok()
}

/// Rolls each row right by a random amount, imitating a shaky hand.
///
/// Row shifts are `floor((height / 1.5) * r / 100)` with `r` drawn from
/// `[0, alpha)`. Values between 5 and 20 give a visible but legible effect.
#[derive(Debug)]
pub struct Distort<R> {
    /// Upper bound (exclusive) of the per-row random percentage.
    pub alpha: u32,
    /// Source of the per-row draws.
    pub rng: R,
}

impl<R: Rng> Transform for Distort<R> {
    fn apply(&mut self, mut image: Canvas) -> Canvas {
        let width = image.width();
        if self.alpha == 0 || width == 0 {
            return image;
        }
        let amplitude = image.height() as f32 / 1.5;
        for y in 0..image.height() {
            let draw = self.rng.gen_range(0..self.alpha);
            let shift = (amplitude * draw as f32 / 100.0) as usize;
            if let Some(row) = image.row_mut(y) {
                row.rotate_right(shift % width);
            }
        }
        image
    }
}

#[cfg(test)]
mod tests;
