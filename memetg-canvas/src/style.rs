//! Image smoothing settings.

use crate::error::CanvasError;
use std::str::FromStr;

/// Image smoothing quality levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSmoothingQuality {
    /// Low quality (fastest).
    Low,
    /// Medium quality (balanced).
    #[default]
    Medium,
    /// High quality (slowest).
    High,
}

impl From<ImageSmoothingQuality> for tiny_skia::FilterQuality {
    fn from(quality: ImageSmoothingQuality) -> Self {
        match quality {
            ImageSmoothingQuality::Low => tiny_skia::FilterQuality::Bilinear,
            ImageSmoothingQuality::Medium => tiny_skia::FilterQuality::Bilinear,
            ImageSmoothingQuality::High => tiny_skia::FilterQuality::Bicubic,
        }
    }
}

impl FromStr for ImageSmoothingQuality {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(ImageSmoothingQuality::Low),
            "medium" => Ok(ImageSmoothingQuality::Medium),
            "high" => Ok(ImageSmoothingQuality::High),
            other => Err(CanvasError::InvalidSmoothingQuality(other.to_string())),
        }
    }
}
