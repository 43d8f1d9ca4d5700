//! Local pixel-filter implementation of `StyleTransform`.
//!
//! Each style is a short chain of CSS filter effects applied to an RGBA8
//! buffer on the blocking pool. Channel writes round half to even, as a
//! canvas `Uint8ClampedArray` does. Alpha is never modified.

use async_trait::async_trait;
use tokio::task;

use buddy_core::error::{BuddyError, Result};
use buddy_core::style::{RgbaImage, StyleTransform, find_style};

/// One step of a filter chain.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Filter {
    /// Mean of R, G and B
    Grayscale,
    Saturate(f64),
    Brightness(f64),
    Contrast(f64),
    /// `blur(1px)`: Gaussian with a standard deviation of one pixel
    Blur,
}

fn filters_for(style_id: &str) -> &'static [Filter] {
    match style_id {
        "portrait-sketch" => &[Filter::Grayscale],
        "ghibli" => &[Filter::Saturate(1.3), Filter::Brightness(1.05)],
        "anime" => &[Filter::Contrast(1.2), Filter::Saturate(1.1)],
        "watercolor" => &[Filter::Blur, Filter::Brightness(1.05)],
        _ => &[],
    }
}

/// Applies styles with local pixel math instead of model inference.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasStyleTransform;

impl CanvasStyleTransform {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous filter application, also used by the async trait impl.
    pub fn apply(image: &mut RgbaImage, style_id: &str) {
        for filter in filters_for(style_id) {
            match filter {
                Filter::Blur => gaussian_blur(image),
                other => map_pixels(image, *other),
            }
        }
    }
}

#[async_trait]
impl StyleTransform for CanvasStyleTransform {
    async fn transform(&self, image: RgbaImage, style_id: &str) -> Result<RgbaImage> {
        if find_style(style_id).is_none() {
            tracing::warn!(
                "[CanvasStyleTransform] Unknown style {}, returning image unchanged",
                style_id
            );
            return Ok(image);
        }

        let style_id = style_id.to_string();
        let (width, height) = (image.width(), image.height());
        let transformed = task::spawn_blocking(move || {
            let mut image = image;
            CanvasStyleTransform::apply(&mut image, &style_id);
            image
        })
        .await
        .map_err(|e| BuddyError::internal(format!("Style transform task failed: {}", e)))?;

        tracing::debug!(
            "[CanvasStyleTransform] Transformed {}x{} image",
            width,
            height
        );
        Ok(transformed)
    }
}

fn map_pixels(image: &mut RgbaImage, filter: Filter) {
    for pixel in image.pixels_mut().chunks_exact_mut(4) {
        let rgb = [pixel[0] as f64, pixel[1] as f64, pixel[2] as f64];
        let out = match filter {
            Filter::Grayscale => [(rgb[0] + rgb[1] + rgb[2]) / 3.0; 3],
            Filter::Saturate(s) => saturate(rgb, s),
            Filter::Brightness(b) => rgb.map(|c| c * b),
            Filter::Contrast(c) => rgb.map(|v| (v - 127.5) * c + 127.5),
            Filter::Blur => rgb,
        };
        pixel[0] = to_channel(out[0]);
        pixel[1] = to_channel(out[1]);
        pixel[2] = to_channel(out[2]);
    }
}

/// Filter-effects saturate matrix.
fn saturate([r, g, b]: [f64; 3], s: f64) -> [f64; 3] {
    [
        (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b,
        (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b,
        (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b,
    ]
}

/// Kernel half-width; weights beyond three deviations round to nothing.
const BLUR_RADIUS: i64 = 3;

fn blur_kernel() -> [f64; (2 * BLUR_RADIUS + 1) as usize] {
    let mut kernel = [0.0; (2 * BLUR_RADIUS + 1) as usize];
    for (i, weight) in kernel.iter_mut().enumerate() {
        let d = i as f64 - BLUR_RADIUS as f64;
        *weight = (-d * d / 2.0).exp();
    }
    let total: f64 = kernel.iter().sum();
    kernel.map(|weight| weight / total)
}

/// Separable Gaussian blur with clamped edges.
fn gaussian_blur(image: &mut RgbaImage) {
    let (width, height) = (image.width() as i64, image.height() as i64);
    if width == 0 || height == 0 {
        return;
    }
    let kernel = blur_kernel();
    let source = image.pixels().to_vec();
    let index = |x: i64, y: i64| (y * width + x) as usize;

    // Horizontal pass into unrounded RGB
    let mut rows = vec![[0.0f64; 3]; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let out = &mut rows[index(x, y)];
            for (k, weight) in kernel.iter().enumerate() {
                let sx = (x + k as i64 - BLUR_RADIUS).clamp(0, width - 1);
                let offset = index(sx, y) * 4;
                for (channel, sum) in out.iter_mut().enumerate() {
                    *sum += weight * source[offset + channel] as f64;
                }
            }
        }
    }

    let pixels = image.pixels_mut();
    for y in 0..height {
        for x in 0..width {
            let mut sums = [0.0f64; 3];
            for (k, weight) in kernel.iter().enumerate() {
                let sy = (y + k as i64 - BLUR_RADIUS).clamp(0, height - 1);
                let row = &rows[index(x, sy)];
                for (sum, value) in sums.iter_mut().zip(row) {
                    *sum += weight * value;
                }
            }
            let offset = index(x, y) * 4;
            for (channel, sum) in sums.iter().enumerate() {
                pixels[offset + channel] = to_channel(*sum);
            }
        }
    }
}

fn to_channel(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}
