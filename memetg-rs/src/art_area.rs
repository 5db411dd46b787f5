//! Where the original artwork sits on a card image.

/// A rectangle in buffer pixel coordinates. Values are not rounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Percentage-based rectangle describing the card template's art area.
///
/// The rectangle is horizontally symmetric: `side_pct` is cut from both the
/// left and right edges. All fetched card images are assumed to share one
/// frame layout; cards with other frames get the same rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArtAreaRect {
    /// Distance from the top edge, percent of card height.
    pub top_pct: f32,
    /// Distance from the left and from the right edge, percent of card width.
    pub side_pct: f32,
    /// Height of the art area, percent of card height.
    pub height_pct: f32,
}

impl ArtAreaRect {
    /// Art area of the standard card frame.
    pub const CARD_TEMPLATE: ArtAreaRect = ArtAreaRect {
        top_pct: 11.0,
        side_pct: 8.0,
        height_pct: 45.0,
    };

    /// Resolve the rectangle against a buffer of `width` x `height` pixels.
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        let width = width as f32;
        let height = height as f32;
        let x = width * (self.side_pct / 100.0);
        let y = height * (self.top_pct / 100.0);
        PixelRect {
            x,
            y,
            width: width - 2.0 * x,
            height: height * (self.height_pct / 100.0),
        }
    }

    /// The rectangle as CSS-style `top`, `left`, `right` and `height` insets.
    pub fn css_insets(&self) -> String {
        format!(
            "top: {}%; left: {}%; right: {}%; height: {}%",
            self.top_pct, self.side_pct, self.side_pct, self.height_pct
        )
    }
}

impl Default for ArtAreaRect {
    fn default() -> Self {
        Self::CARD_TEMPLATE
    }
}
