//! Error types for memetg-canvas.

use thiserror::Error;

/// Result type alias using CanvasError.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Invalid canvas dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length does not match the declared image size.
    #[error("Invalid image data: expected {expected} bytes for {width}x{height}, got {actual}")]
    InvalidImageData {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Unrecognized image smoothing quality name.
    #[error("Invalid image smoothing quality: {0}")]
    InvalidSmoothingQuality(String),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),
}

impl From<png::EncodingError> for CanvasError {
    fn from(err: png::EncodingError) -> Self {
        CanvasError::PngError(err.to_string())
    }
}
