//! Separable Gaussian blur.
//!
//! The 2-D Gaussian factors into a horizontal and a vertical 1-D pass.
//! The horizontal pass writes a full RGBA8 intermediate which the vertical
//! pass then reads.
//!
//! ## Alpha Handling
//!
//! Pixels are straight alpha. Color channels are averaged with weights
//! `w * alpha`, alpha itself with weights `w`. Fully transparent neighbors
//! therefore contribute no color, and a pixel's RGB keeps the ratios of
//! the opaque pixels around it. A window with zero total alpha produces
//! `[0, 0, 0, 0]`.
//!
//! ## Boundary Handling
//!
//! Near an edge the window is clipped to the pixels that exist and the
//! alpha result is divided by the sum of the weights actually used, so
//! border pixels keep their full intensity.

use ndarray::{Array3, ArrayView3};
use tracing::debug;

use super::kernel::Kernel;
use super::{clamp_channel, fill_rows, rgba_at, store_rgba};
use crate::buffer::PixelBuffer;

/// Apply Gaussian blur to an RGBA8 buffer.
///
/// # Arguments
/// * `input` - Source buffer (left untouched)
/// * `sigma` - Standard deviation of the Gaussian; `0` returns a copy
///
/// # Returns
/// Blurred buffer with the same dimensions, anchored at `(0, 0)`
pub fn gaussian_blur(input: &PixelBuffer, sigma: f64) -> PixelBuffer {
    // A 1x1 buffer still needs radius 1 so a transparent pixel goes through
    // the zero-alpha rule instead of the identity shortcut.
    let max_radius = input.width().max(input.height()).max(2) - 1;
    let kernel = Kernel::gaussian_within(sigma, max_radius);
    debug!(
        sigma,
        radius = kernel.radius(),
        width = input.width(),
        height = input.height(),
        "gaussian blur"
    );
    convolve(input, &kernel)
}

/// Convolve rows, then columns, with a symmetric 1-D kernel.
pub fn convolve(input: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    if kernel.is_identity() || input.is_empty() {
        return input.normalized();
    }

    // Pass 1: Horizontal
    let temp = convolve_horizontal(input.view(), kernel);
    // Pass 2: Vertical
    let output = convolve_vertical(temp.view(), kernel);

    PixelBuffer::from_output(output)
}

fn convolve_horizontal(src: ArrayView3<u8>, kernel: &Kernel) -> Array3<u8> {
    let (height, width, _) = src.dim();
    fill_rows(height, width, |y, mut row| {
        for x in 0..width {
            let px = convolve_at(x, width, kernel, |i| rgba_at(&src, y, i));
            store_rgba(&mut row, x, px);
        }
    })
}

fn convolve_vertical(src: ArrayView3<u8>, kernel: &Kernel) -> Array3<u8> {
    let (height, width, _) = src.dim();
    fill_rows(height, width, |y, mut row| {
        for x in 0..width {
            let px = convolve_at(y, height, kernel, |i| rgba_at(&src, i, x));
            store_rgba(&mut row, x, px);
        }
    })
}

/// Weighted average around `pos` along a line of `len` pixels.
#[inline]
fn convolve_at<F>(pos: usize, len: usize, kernel: &Kernel, sample: F) -> [u8; 4]
where
    F: Fn(usize) -> [u8; 4],
{
    let radius = kernel.radius();
    let weights = kernel.weights();
    let lo = pos.saturating_sub(radius);
    let hi = pos.saturating_add(radius).min(len - 1);

    let mut sum_rgb = [0.0f64; 3];
    let mut sum_alpha = 0.0f64;
    let mut sum_weight = 0.0f64;

    for i in lo..=hi {
        let w = weights[i + radius - pos];
        let px = sample(i);
        let wa = px[3] as f64 * w;
        sum_weight += w;
        for c in 0..3 {
            sum_rgb[c] += px[c] as f64 * wa;
        }
        sum_alpha += wa;
    }

    if sum_alpha == 0.0 {
        return [0; 4];
    }

    let inv_alpha = 1.0 / sum_alpha;
    [
        clamp_channel(sum_rgb[0] * inv_alpha),
        clamp_channel(sum_rgb[1] * inv_alpha),
        clamp_channel(sum_rgb[2] * inv_alpha),
        clamp_channel(sum_alpha / sum_weight),
    ]
}
