//! Borrowed pixel buffers passed to canvas drawing operations.

/// Borrowed pixel data in premultiplied RGBA form (internal rendering format).
#[derive(Debug, Clone, Copy)]
pub(crate) struct CanvasPixmapRef<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
}

/// Borrowed image data in standard, non-premultiplied RGBA form.
///
/// This is the format produced by decoding a PNG/JPEG with the `image` crate
/// (`to_rgba8().into_raw()`), and the format returned by `get_image_data`.
#[derive(Debug, Clone, Copy)]
pub struct CanvasImageDataRef<'a> {
    /// RGBA pixel data, non-premultiplied, 4 bytes per pixel.
    pub data: &'a [u8],
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasImageDataRef<'_> {
    /// Number of bytes a buffer of this size must hold.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Whether `data` holds exactly one RGBA pixel per image position.
    pub fn is_well_formed(&self) -> bool {
        self.width > 0 && self.height > 0 && self.data.len() == self.expected_len()
    }
}
