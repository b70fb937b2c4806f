//! Convolution effects for RGBA8 pixel buffers.
//!
//! ## Effects
//!
//! | Effect | Entry point | Weights | Boundary |
//! |--------|-------------|---------|----------|
//! | Gaussian blur | [`gaussian_blur`] | sampled Gaussian, `r = ceil(3σ)` | window clipped, weights renormalized |
//! | Stack blur | [`stack_blur`] | triangular, `r` given | edge pixels replicated |
//! | Sharpen | [`sharpen`] | unsharp mask over a Gaussian | inherited from Gaussian blur |
//!
//! ## Architecture
//!
//! All effects follow these principles:
//! - **Pure** - input buffers are never modified, a new buffer is returned
//! - **Two passes** - rows first, then columns, with the full intermediate
//!   materialized in between
//! - **Row parallel** - each pass hands whole output rows to rayon workers
//!   (single-threaded on wasm32)
//! - **Origin free** - outputs always start at `(0, 0)`

use ndarray::{Array3, ArrayView3, ArrayViewMut2, Axis};
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::buffer::CHANNELS;

pub mod convolve;
pub mod kernel;
pub mod sharpen;
pub mod stack_blur;

pub use convolve::{convolve, gaussian_blur};
pub use kernel::{Kernel, MAX_KERNEL_RADIUS};
pub use sharpen::{sharpen, sharpen_gain, SHARPEN_SIGMA_CEILING};
pub use stack_blur::{stack_blur, StackRadius, MAX_STACK_RADIUS};

/// Rounds half up and clamps into the u8 range.
#[inline]
pub(crate) fn clamp_channel(v: f64) -> u8 {
    (v + 0.5).clamp(0.0, 255.0) as u8
}

#[inline]
pub(crate) fn rgba_at(src: &ArrayView3<u8>, y: usize, x: usize) -> [u8; 4] {
    [src[[y, x, 0]], src[[y, x, 1]], src[[y, x, 2]], src[[y, x, 3]]]
}

#[inline]
pub(crate) fn store_rgba(row: &mut ArrayViewMut2<u8>, x: usize, px: [u8; 4]) {
    for c in 0..CHANNELS {
        row[[x, c]] = px[c];
    }
}

/// Allocates a `(height, width, 4)` output and fills it row by row.
///
/// `fill` receives the row index and a mutable `(width, 4)` view of that
/// row. Rows are independent, so they are filled in parallel.
pub(crate) fn fill_rows<F>(height: usize, width: usize, fill: F) -> Array3<u8>
where
    F: Fn(usize, ArrayViewMut2<'_, u8>) + Sync + Send,
{
    let mut output = Array3::<u8>::zeros((height, width, CHANNELS));

    #[cfg(not(target_arch = "wasm32"))]
    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, row)| fill(y, row));

    #[cfg(target_arch = "wasm32")]
    output
        .axis_iter_mut(Axis(0))
        .enumerate()
        .for_each(|(y, row)| fill(y, row));

    output
}
