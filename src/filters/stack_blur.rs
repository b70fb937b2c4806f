//! Stack blur: fast approximate Gaussian with triangular weights.
//!
//! Within a window of `2r + 1` pixels the sample at offset `i` has weight
//! `r + 1 - |i|`, so the weights add up to `(r + 1)²`. Instead of
//! re-summing the window at each pixel, a ring buffer (the "stack") keeps
//! the window's samples together with three running sums:
//!
//! - `sum`: the weighted sum of the whole window
//! - `sum_out`: the plain sum of the trailing half (offsets `-r..=0`)
//! - `sum_in`: the plain sum of the leading half (offsets `1..=r`)
//!
//! Sliding by one pixel subtracts `sum_out`, drops the oldest sample,
//! admits the next one, adds `sum_in`, and moves the new center sample
//! from the leading into the trailing half. Every step is O(1) whatever
//! the radius.
//!
//! Samples past either end of a line repeat the edge pixel. All four
//! channels, alpha included, are blurred independently with integer sums.

use ndarray::{Array3, ArrayView3};
use tracing::debug;

use super::{fill_rows, rgba_at, store_rgba};
use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::{EffectError, EffectResult};

/// Largest radius whose weight total `(r + 1)²` fits in a `u32`.
pub const MAX_STACK_RADIUS: u32 = 65_534;

/// Validated stack blur radius.
///
/// Built from the caller's signed radius so that a negative value is
/// reported instead of wrapping around to a huge unsigned window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StackRadius(u32);

impl StackRadius {
    pub const ZERO: StackRadius = StackRadius(0);

    pub fn new(radius: u32) -> EffectResult<Self> {
        if radius > MAX_STACK_RADIUS {
            return Err(EffectError::InvalidRadius(radius as i64));
        }
        Ok(Self(radius))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Number of samples held by the stack.
    pub fn window(self) -> usize {
        2 * self.0 as usize + 1
    }

    /// Sum of all triangular weights.
    pub fn divisor(self) -> u64 {
        let r = self.0 as u64 + 1;
        r * r
    }
}

impl TryFrom<i64> for StackRadius {
    type Error = EffectError;

    fn try_from(radius: i64) -> EffectResult<Self> {
        let unsigned = u32::try_from(radius).map_err(|_| EffectError::InvalidRadius(radius))?;
        Self::new(unsigned)
    }
}

/// Apply stack blur to an RGBA8 buffer.
///
/// # Arguments
/// * `input` - Source buffer (left untouched)
/// * `radius` - Window radius in pixels; `0` returns a copy
///
/// # Errors
/// [`EffectError::InvalidRadius`] if `radius` is negative or larger than
/// [`MAX_STACK_RADIUS`].
pub fn stack_blur(input: &PixelBuffer, radius: i64) -> EffectResult<PixelBuffer> {
    let radius = StackRadius::try_from(radius)?;
    Ok(stack_blur_with(input, radius))
}

/// Stack blur with an already validated radius.
pub fn stack_blur_with(input: &PixelBuffer, radius: StackRadius) -> PixelBuffer {
    debug!(
        radius = radius.get(),
        width = input.width(),
        height = input.height(),
        "stack blur"
    );

    if radius == StackRadius::ZERO || input.is_empty() {
        return input.normalized();
    }

    // Pass 1: rows
    let horizontal = blur_rows(input.view(), radius);
    // Pass 2: columns, run as rows of the transposed intermediate
    let transposed = transpose(horizontal.view());
    let vertical = blur_rows(transposed.view(), radius);

    PixelBuffer::from_output(transpose(vertical.view()))
}

fn transpose(src: ArrayView3<u8>) -> Array3<u8> {
    src.permuted_axes([1, 0, 2]).as_standard_layout().into_owned()
}

fn blur_rows(src: ArrayView3<u8>, radius: StackRadius) -> Array3<u8> {
    let (height, width, _) = src.dim();
    let last = width as isize - 1;
    let r = radius.get() as isize;
    let divisor = radius.divisor();

    fill_rows(height, width, |y, mut row| {
        let sample = |i: isize| rgba_at(&src, y, i.clamp(0, last) as usize);
        let mut stack = BlurStack::prime(radius, &sample);

        for x in 0..width {
            store_rgba(&mut row, x, stack.average(divisor));
            if x + 1 < width {
                stack.slide(sample(x as isize + r + 1));
            }
        }
    })
}

/// Sliding window state for one line.
struct BlurStack {
    samples: Vec<[u8; 4]>,
    oldest: usize,
    radius: usize,
    sum: [u64; 4],
    sum_out: [u64; 4],
    sum_in: [u64; 4],
}

impl BlurStack {
    /// Fills the window centered on position 0.
    fn prime<F>(radius: StackRadius, sample: F) -> Self
    where
        F: Fn(isize) -> [u8; 4],
    {
        let r = radius.get() as usize;
        let mut stack = BlurStack {
            samples: Vec::with_capacity(radius.window()),
            oldest: 0,
            radius: r,
            sum: [0; 4],
            sum_out: [0; 4],
            sum_in: [0; 4],
        };

        for k in 0..radius.window() {
            let px = sample(k as isize - r as isize);
            let weight = (r + 1 - k.abs_diff(r)) as u64;
            for c in 0..CHANNELS {
                let v = px[c] as u64;
                stack.sum[c] += v * weight;
                if k <= r {
                    stack.sum_out[c] += v;
                } else {
                    stack.sum_in[c] += v;
                }
            }
            stack.samples.push(px);
        }
        stack
    }

    #[inline]
    fn average(&self, divisor: u64) -> [u8; 4] {
        let half = divisor / 2;
        let mut px = [0u8; 4];
        for c in 0..CHANNELS {
            px[c] = ((self.sum[c] + half) / divisor) as u8;
        }
        px
    }

    /// Advances the window center by one pixel.
    #[inline]
    fn slide(&mut self, incoming: [u8; 4]) {
        let size = self.samples.len();
        let evicted = self.samples[self.oldest];
        for c in 0..CHANNELS {
            self.sum[c] -= self.sum_out[c];
            self.sum_out[c] -= evicted[c] as u64;
        }

        self.samples[self.oldest] = incoming;
        self.oldest = (self.oldest + 1) % size;
        for c in 0..CHANNELS {
            self.sum_in[c] += incoming[c] as u64;
            self.sum[c] += self.sum_in[c];
        }

        let center = self.samples[(self.oldest + self.radius) % size];
        for c in 0..CHANNELS {
            self.sum_out[c] += center[c] as u64;
            self.sum_in[c] -= center[c] as u64;
        }
    }
}
