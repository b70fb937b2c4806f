//! Unsharp-mask sharpening.
//!
//! The buffer is blurred with [`gaussian_blur`] and the difference between
//! the original and the blur is added back:
//!
//! ```text
//! out = clamp(orig + gain(σ) * (orig - blurred), 0, 255)
//! ```
//!
//! The blur sigma is capped at [`SHARPEN_SIGMA_CEILING`]: past it the mask
//! no longer widens, so cost and halo size stay bounded however large the
//! requested sigma. Every channel, alpha included, goes through the same
//! arithmetic.

use ndarray::Zip;
use tracing::debug;

use super::convolve::gaussian_blur;
use crate::buffer::PixelBuffer;

/// Largest sigma used for the internal blur.
pub const SHARPEN_SIGMA_CEILING: f64 = 10.0;

/// Weight of the detail layer for a given sigma.
///
/// Zero at `sigma <= 0` (identity), one for every positive sigma.
pub fn sharpen_gain(sigma: f64) -> i32 {
    if sigma > 0.0 {
        1
    } else {
        0
    }
}

/// Apply unsharp-mask sharpening to an RGBA8 buffer.
///
/// # Arguments
/// * `input` - Source buffer (left untouched)
/// * `sigma` - Sharpening radius; `0` returns a copy
///
/// # Returns
/// Sharpened buffer with the same dimensions, anchored at `(0, 0)`
pub fn sharpen(input: &PixelBuffer, sigma: f64) -> PixelBuffer {
    let gain = sharpen_gain(sigma);
    if gain == 0 || input.is_empty() {
        return input.normalized();
    }

    let blur_sigma = sigma.min(SHARPEN_SIGMA_CEILING);
    debug!(sigma, blur_sigma, gain, "sharpen");

    let blurred = gaussian_blur(input, blur_sigma).into_array();
    let mut output = blurred.clone();

    let unsharp = |out: &mut u8, &orig: &u8, &blur: &u8| {
        let orig = orig as i32;
        let detail = orig - blur as i32;
        *out = (orig + gain * detail).clamp(0, 255) as u8;
    };
    let zip = Zip::from(&mut output).and(input.view()).and(&blurred);

    #[cfg(not(target_arch = "wasm32"))]
    zip.par_for_each(unsharp);
    #[cfg(target_arch = "wasm32")]
    zip.for_each(unsharp);

    PixelBuffer::from_output(output)
}
