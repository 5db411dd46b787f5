//! Canvas rendering context implementation.

mod image_ops;

use crate::drawing_state::DrawingState;
use crate::error::{CanvasError, CanvasResult};
use crate::style::ImageSmoothingQuality;
use tiny_skia::Pixmap;

/// Maximum canvas dimension (same as Chrome).
const MAX_DIMENSION: u32 = 32767;

/// Canvas rendering context.
pub struct CanvasContext {
    /// Width of the canvas in pixels.
    pub(crate) width: u32,
    /// Height of the canvas in pixels.
    pub(crate) height: u32,
    /// Pixel buffer (premultiplied RGBA).
    pub(crate) pixmap: Pixmap,
    /// Current drawing state.
    pub(crate) state: DrawingState,
    /// Stack of saved drawing states.
    state_stack: Vec<DrawingState>,
}

impl CanvasContext {
    /// Create a new, fully transparent CanvasContext with the specified dimensions.
    pub fn new(width: u32, height: u32) -> CanvasResult<Self> {
        // Validate dimensions
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(CanvasError::InvalidDimensions { width, height });
        }

        let pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidDimensions { width, height })?;

        log::debug!(target: "canvas", "new canvas {}x{}", width, height);
        Ok(Self {
            width,
            height,
            pixmap,
            state: DrawingState::default(),
            state_stack: Vec::new(),
        })
    }

    /// Get canvas width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get canvas height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Save the current drawing state.
    pub fn save(&mut self) {
        log::debug!(target: "canvas", "save");
        self.state_stack.push(self.state.clone());
    }

    /// Restore the previously saved drawing state.
    pub fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
    }

    // --- Image smoothing ---

    /// Set the image smoothing quality.
    pub fn set_image_smoothing_quality(&mut self, quality: ImageSmoothingQuality) {
        self.state.image_smoothing_quality = quality;
    }

    /// Get the image smoothing quality.
    pub fn get_image_smoothing_quality(&self) -> ImageSmoothingQuality {
        self.state.image_smoothing_quality
    }

    /// Get the filter quality for image rendering based on smoothing settings.
    pub(crate) fn get_image_filter_quality(&self) -> tiny_skia::FilterQuality {
        self.state.image_smoothing_quality.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_defaults() {
        let ctx = CanvasContext::new(200, 150).unwrap();
        assert_eq!(ctx.width(), 200);
        assert_eq!(ctx.height(), 150);
        assert_eq!(
            ctx.state.image_smoothing_quality,
            ImageSmoothingQuality::Medium
        );
        // Canvas should be fully transparent
        assert!(ctx.pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            CanvasContext::new(0, 100),
            Err(CanvasError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            CanvasContext::new(100, 0),
            Err(CanvasError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            CanvasContext::new(MAX_DIMENSION + 1, 10),
            Err(CanvasError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_save_restore_smoothing() {
        let mut ctx = CanvasContext::new(10, 10).unwrap();
        ctx.save();
        ctx.set_image_smoothing_quality(ImageSmoothingQuality::High);
        assert_eq!(
            ctx.get_image_filter_quality(),
            tiny_skia::FilterQuality::Bicubic
        );
        ctx.restore();
        assert_eq!(ctx.get_image_smoothing_quality(), ImageSmoothingQuality::Medium);

        // Unbalanced restore is a no-op
        ctx.restore();
        assert_eq!(ctx.get_image_smoothing_quality(), ImageSmoothingQuality::Medium);
        assert_eq!(ctx.state, DrawingState::default());
    }
}
