//! Error types for effect operations.

use thiserror::Error;

/// Error type for effect operations.
#[derive(Error, Debug)]
pub enum EffectError {
    /// Stack blur radius that cannot be used as a window size.
    #[error("invalid blur radius: {0}")]
    InvalidRadius(i64),

    /// Pixel data inconsistent with the declared geometry.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// JPEG quality outside 1..=100.
    #[error("invalid JPEG quality {0}, expected 1..=100")]
    InvalidQuality(i32),

    /// Failure reported by an encoder.
    #[error("encode failed: {0}")]
    Encode(String),

    /// Writer failure while encoding.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for effect operations.
pub type EffectResult<T> = Result<T, EffectError>;
