//! RGBA8 pixel buffer shared by every effect.
//!
//! ## Layout
//!
//! | Axis | Meaning |
//! |------|---------|
//! | 0 | row (y), `height` entries |
//! | 1 | column (x), `width` entries |
//! | 2 | channel: R, G, B, A |
//!
//! Channels are straight (not premultiplied) 8-bit values. The backing
//! array is always in standard (row-major) layout, so the raw bytes have a
//! row stride of exactly `4 * width`.
//!
//! A buffer may carry a non-zero origin, e.g. when it was cut out of a
//! larger image upstream. Effects ignore the origin when reading and
//! always produce buffers anchored at `(0, 0)`.

use ndarray::{Array3, ArrayView3, ArrayViewMut3};

use crate::error::{EffectError, EffectResult};

/// Number of channels per pixel.
pub const CHANNELS: usize = 4;

/// Rectangular grid of RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Array3<u8>,
    origin: (i32, i32),
}

impl PixelBuffer {
    /// Creates a fully transparent black buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: Array3::zeros((height, width, CHANNELS)),
            origin: (0, 0),
        }
    }

    /// Creates a buffer filled with one pixel value.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let mut buffer = Self::new(width, height);
        for mut px in buffer.pixels.lanes_mut(ndarray::Axis(2)) {
            for c in 0..CHANNELS {
                px[c] = rgba[c];
            }
        }
        buffer
    }

    /// Wraps tightly packed RGBA bytes (`data.len() == width * height * 4`).
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> EffectResult<Self> {
        let expected = packed_len(width, height)?;
        if data.len() != expected {
            return Err(EffectError::InvalidDimensions(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        let pixels = Array3::from_shape_vec((height, width, CHANNELS), data)
            .map_err(|e| EffectError::InvalidDimensions(e.to_string()))?;
        Ok(Self { pixels, origin: (0, 0) })
    }

    /// Copies RGBA rows out of a strided byte slice.
    ///
    /// `stride` is the distance in bytes between the starts of two rows and
    /// must be at least `4 * width`. Padding bytes past each row are dropped.
    pub fn from_raw_with_stride(
        width: usize,
        height: usize,
        stride: usize,
        data: &[u8],
    ) -> EffectResult<Self> {
        let row_bytes = width
            .checked_mul(CHANNELS)
            .ok_or_else(|| EffectError::InvalidDimensions("width overflows".into()))?;
        if stride < row_bytes {
            return Err(EffectError::InvalidDimensions(format!(
                "stride {} is smaller than row size {}",
                stride, row_bytes
            )));
        }
        if height == 0 || row_bytes == 0 {
            return Ok(Self::new(width, height));
        }
        let needed = stride
            .checked_mul(height - 1)
            .and_then(|v| v.checked_add(row_bytes))
            .ok_or_else(|| EffectError::InvalidDimensions("image dimensions overflow".into()))?;
        if data.len() < needed {
            return Err(EffectError::InvalidDimensions(format!(
                "expected at least {} bytes, got {}",
                needed,
                data.len()
            )));
        }

        let mut packed = Vec::with_capacity(row_bytes * height);
        for row in data.chunks(stride).take(height) {
            packed.extend_from_slice(&row[..row_bytes]);
        }
        Self::from_raw(width, height, packed)
    }

    /// Wraps an `(height, width, 4)` array.
    pub fn from_array(pixels: Array3<u8>) -> EffectResult<Self> {
        let channels = pixels.shape()[2];
        if channels != CHANNELS {
            return Err(EffectError::InvalidDimensions(format!(
                "expected 4 channels, got {}",
                channels
            )));
        }
        let pixels = if pixels.is_standard_layout() {
            pixels
        } else {
            pixels.as_standard_layout().into_owned()
        };
        Ok(Self { pixels, origin: (0, 0) })
    }

    /// Returns the same pixels anchored at `(x, y)`.
    pub fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.origin = (x, y);
        self
    }

    pub fn width(&self) -> usize {
        self.pixels.shape()[1]
    }

    pub fn height(&self) -> usize {
        self.pixels.shape()[0]
    }

    /// Position of the top-left pixel in the caller's coordinate space.
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// Bytes per row of the packed representation.
    pub fn stride(&self) -> usize {
        self.width() * CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Pixel at `(x, y)` relative to the buffer's top-left corner.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let p = &self.pixels;
        [p[[y, x, 0]], p[[y, x, 1]], p[[y, x, 2]], p[[y, x, 3]]]
    }

    /// Overwrites the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        for c in 0..CHANNELS {
            self.pixels[[y, x, c]] = rgba[c];
        }
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    pub fn view_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        self.pixels.view_mut()
    }

    /// Packed RGBA bytes, row by row.
    pub fn to_raw(&self) -> Vec<u8> {
        self.pixels.iter().copied().collect()
    }

    /// Consumes the buffer and returns its packed RGBA bytes.
    pub fn into_raw(self) -> Vec<u8> {
        if self.pixels.is_standard_layout() {
            self.pixels.into_raw_vec_and_offset().0
        } else {
            self.pixels.iter().copied().collect()
        }
    }

    pub fn into_array(self) -> Array3<u8> {
        self.pixels
    }

    /// Compares dimensions and pixel values, ignoring the origin.
    pub fn same_pixels(&self, other: &PixelBuffer) -> bool {
        self.pixels == other.pixels
    }

    /// Wraps an effect output; callers guarantee shape `(h, w, 4)`.
    pub(crate) fn from_output(pixels: Array3<u8>) -> PixelBuffer {
        debug_assert_eq!(pixels.shape()[2], CHANNELS);
        PixelBuffer { pixels, origin: (0, 0) }
    }

    /// Copy of the pixels anchored at `(0, 0)`.
    pub(crate) fn normalized(&self) -> PixelBuffer {
        PixelBuffer {
            pixels: self.pixels.clone(),
            origin: (0, 0),
        }
    }
}

fn packed_len(width: usize, height: usize) -> EffectResult<usize> {
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or_else(|| EffectError::InvalidDimensions("image dimensions overflow".into()))
}
