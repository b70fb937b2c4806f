//! Sequential effect pipeline with a sticky error.
//!
//! A [`Chain`] holds the current buffer and the first error raised by any
//! step. Once an error is recorded every later step is skipped, and the
//! terminal writers return that first error without encoding anything.
//!
//! Codecs live outside this crate: the terminal writers hand the buffer to
//! an [`ImageEncoder`] supplied by the caller.
//!
//! # Example
//!
//! ```rust
//! use stag_effects::{Chain, PixelBuffer};
//!
//! let image = PixelBuffer::filled(8, 8, [40, 80, 120, 255]);
//! let result = Chain::new(image)
//!     .gaussian_blur(1.5)
//!     .stack_blur(-3) // fails, later steps are skipped
//!     .sharpen(0.5)
//!     .into_result();
//! assert!(result.is_err());
//! ```

use std::io::Write;

use tracing::{debug, trace};

use crate::buffer::PixelBuffer;
use crate::error::{EffectError, EffectResult};
use crate::filters;

/// Encoder collaborator used by the chain's terminal operations.
pub trait ImageEncoder {
    /// Writes `buffer` as PNG.
    fn encode_png(&self, buffer: &PixelBuffer, writer: &mut dyn Write) -> EffectResult<()>;

    /// Writes `buffer` as JPEG; `quality` is already validated to 1..=100.
    fn encode_jpeg(
        &self,
        buffer: &PixelBuffer,
        writer: &mut dyn Write,
        quality: u8,
    ) -> EffectResult<()>;
}

/// Lowest accepted JPEG quality.
pub const MIN_JPEG_QUALITY: i32 = 1;
/// Highest accepted JPEG quality.
pub const MAX_JPEG_QUALITY: i32 = 100;

/// Effect pipeline over one buffer.
#[derive(Debug)]
pub struct Chain {
    buffer: PixelBuffer,
    error: Option<EffectError>,
}

impl Chain {
    pub fn new(buffer: PixelBuffer) -> Self {
        Self { buffer, error: None }
    }

    /// Starts from a decode result; a decode failure becomes the sticky error.
    pub fn from_result(result: EffectResult<PixelBuffer>) -> Self {
        match result {
            Ok(buffer) => Self::new(buffer),
            Err(error) => Self {
                buffer: PixelBuffer::new(0, 0),
                error: Some(error),
            },
        }
    }

    /// Runs a fallible step unless an earlier step failed.
    ///
    /// This is how collaborators outside the crate (resize, crop) join the
    /// chain.
    pub fn apply<F>(mut self, step: &str, f: F) -> Self
    where
        F: FnOnce(&PixelBuffer) -> EffectResult<PixelBuffer>,
    {
        if self.error.is_some() {
            trace!(step, "skipped after earlier failure");
            return self;
        }

        debug!(step, width = self.buffer.width(), height = self.buffer.height(), "chain step");
        match f(&self.buffer) {
            Ok(buffer) => self.buffer = buffer,
            Err(error) => {
                debug!(step, %error, "chain step failed");
                self.error = Some(error);
            }
        }
        self
    }

    pub fn gaussian_blur(self, sigma: f64) -> Self {
        self.apply("gaussian_blur", |buf| Ok(filters::gaussian_blur(buf, sigma)))
    }

    pub fn stack_blur(self, radius: i64) -> Self {
        self.apply("stack_blur", |buf| filters::stack_blur(buf, radius))
    }

    pub fn sharpen(self, sigma: f64) -> Self {
        self.apply("sharpen", |buf| Ok(filters::sharpen(buf, sigma)))
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// First error raised by the chain, if any.
    pub fn error(&self) -> Option<&EffectError> {
        self.error.as_ref()
    }

    /// Current buffer. After a failure this is the last successful result.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn into_result(self) -> EffectResult<PixelBuffer> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.buffer),
        }
    }

    /// Encodes the current buffer as PNG.
    pub fn write_png<E, W>(self, encoder: &E, writer: &mut W) -> EffectResult<()>
    where
        E: ImageEncoder + ?Sized,
        W: Write,
    {
        let buffer = self.into_result()?;
        debug!(width = buffer.width(), height = buffer.height(), "encode png");
        encoder.encode_png(&buffer, writer)
    }

    /// Encodes the current buffer as JPEG, `quality` in 1..=100.
    pub fn write_jpeg<E, W>(self, encoder: &E, writer: &mut W, quality: i32) -> EffectResult<()>
    where
        E: ImageEncoder + ?Sized,
        W: Write,
    {
        let buffer = self.into_result()?;
        if !(MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality) {
            return Err(EffectError::InvalidQuality(quality));
        }
        debug!(width = buffer.width(), height = buffer.height(), quality, "encode jpeg");
        encoder.encode_jpeg(&buffer, writer, quality as u8)
    }
}
