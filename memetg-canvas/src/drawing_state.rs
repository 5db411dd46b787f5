//! Drawing state that can be saved and restored.

use crate::style::ImageSmoothingQuality;

/// Drawing state that can be saved and restored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingState {
    /// Image smoothing quality level.
    pub image_smoothing_quality: ImageSmoothingQuality,
}
