//! Draw a card, overlay a background into its art area, encode the result.

use crate::art_area::ArtAreaRect;
use crate::error::MemetgResult;
use crate::image_loading::LoadedImage;
use log::debug;
use memetg_canvas::{CanvasContext, ImageSmoothingQuality};

/// Settings for one composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeOptions {
    pub art_area: ArtAreaRect,
    /// Resampling used when stretching the background into the art area.
    pub smoothing: ImageSmoothingQuality,
    /// Pixel density written to the PNG metadata.
    pub ppi: Option<f32>,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            art_area: ArtAreaRect::CARD_TEMPLATE,
            smoothing: ImageSmoothingQuality::High,
            ppi: None,
        }
    }
}

/// The encoded composite. Same dimensions as the card image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeResult {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Composite `background` into the art area of `card` and encode as PNG.
///
/// The canvas is allocated at the card's natural size, so the output
/// resolution always equals the source resolution. The card is drawn first;
/// the background is stretched (aspect ratio not preserved) over the art area
/// on top of it. Without a background the output pixels are the card's own.
pub fn compose(
    card: &LoadedImage,
    background: Option<&LoadedImage>,
    options: &CompositeOptions,
) -> MemetgResult<CompositeResult> {
    let width = card.width();
    let height = card.height();
    let mut ctx = CanvasContext::new(width, height)?;

    // The base layer is copied at natural size, which is exactly the canvas size
    ctx.put_image_data_exact(&card.as_image_data())?;

    if let Some(background) = background {
        let rect = options.art_area.to_pixels(width, height);
        debug!(
            "Overlaying {}x{} background at {:?}",
            background.width(),
            background.height(),
            rect
        );
        ctx.save();
        ctx.set_image_smoothing_quality(options.smoothing);
        ctx.draw_image_data_scaled(
            &background.as_image_data(),
            rect.x,
            rect.y,
            rect.width,
            rect.height,
        );
        ctx.restore();
    }

    let png = ctx.to_png(options.ppi)?;
    Ok(CompositeResult { png, width, height })
}
