//! Image drawing, pixel data, and PNG output operations for CanvasContext.

use super::CanvasContext;
use crate::error::{CanvasError, CanvasResult};
use crate::geometry::{CanvasImageDataRef, CanvasPixmapRef};
use tiny_skia::Transform;

impl CanvasContext {
    // --- Internal image drawing ---

    /// Internal: draw a premultiplied-alpha pixmap stretched to (dx, dy, dw, dh).
    pub(crate) fn draw_image_scaled(
        &mut self,
        image: CanvasPixmapRef,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
    ) {
        log::debug!(
            target: "canvas",
            "drawImage {}x{} into {} {} {} {}",
            image.width, image.height, dx, dy, dw, dh
        );
        if dw <= 0.0 || dh <= 0.0 || !dw.is_finite() || !dh.is_finite() {
            return;
        }
        let Some(pixmap) = tiny_skia::PixmapRef::from_bytes(image.data, image.width, image.height)
        else {
            return;
        };
        let paint = tiny_skia::PixmapPaint {
            quality: self.get_image_filter_quality(),
            ..tiny_skia::PixmapPaint::default()
        };

        // Calculate scale factors (aspect ratio is not preserved)
        let scale_x = dw / image.width as f32;
        let scale_y = dh / image.height as f32;

        // Translate to destination position, then scale
        let transform = Transform::from_translate(dx, dy).pre_scale(scale_x, scale_y);

        self.pixmap
            .draw_pixmap(0, 0, pixmap, &paint, transform, None);
    }

    // --- Public draw image methods ---

    /// Draw image data stretched to the specified destination rectangle.
    pub fn draw_image_data_scaled(
        &mut self,
        image: &CanvasImageDataRef<'_>,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
    ) {
        if !image.is_well_formed() {
            log::warn!(target: "canvas", "drawImage skipped: malformed {}x{} image", image.width, image.height);
            return;
        }
        let premultiplied = premultiply_alpha(image.data);
        let pixmap_ref = CanvasPixmapRef {
            data: &premultiplied,
            width: image.width,
            height: image.height,
        };
        self.draw_image_scaled(pixmap_ref, dx, dy, dw, dh);
    }

    // --- Image data ---

    /// Get image data for a region of the canvas.
    ///
    /// Returns non-premultiplied RGBA, 4 bytes per pixel. Pixels outside the
    /// canvas read as transparent black.
    pub fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0u8; (width * height * 4) as usize];

        for dy in 0..height {
            for dx in 0..width {
                let src_x = x + dx as i32;
                let src_y = y + dy as i32;

                let dst_idx = ((dy * width + dx) * 4) as usize;

                if src_x >= 0
                    && src_x < self.width as i32
                    && src_y >= 0
                    && src_y < self.height as i32
                {
                    let src_idx = (src_y as u32 * self.width + src_x as u32) as usize;
                    let pixel = &self.pixmap.data()[src_idx * 4..src_idx * 4 + 4];

                    // Convert from premultiplied alpha to straight alpha
                    let a = pixel[3];
                    if a == 0 {
                        data[dst_idx..dst_idx + 4].copy_from_slice(&[0, 0, 0, 0]);
                    } else if a == 255 {
                        data[dst_idx..dst_idx + 4].copy_from_slice(pixel);
                    } else {
                        let alpha_f = a as f32 / 255.0;
                        data[dst_idx] = (pixel[0] as f32 / alpha_f).min(255.0) as u8;
                        data[dst_idx + 1] = (pixel[1] as f32 / alpha_f).min(255.0) as u8;
                        data[dst_idx + 2] = (pixel[2] as f32 / alpha_f).min(255.0) as u8;
                        data[dst_idx + 3] = a;
                    }
                }
            }
        }

        data
    }

    /// Write image data to the canvas at the specified position.
    ///
    /// The data must be in non-premultiplied RGBA format (standard ImageData format).
    /// This bypasses compositing and writes pixels directly, so an image put at
    /// (0, 0) with the canvas's own size reproduces its opaque pixels exactly.
    /// Pixels outside the canvas bounds are silently ignored.
    pub fn put_image_data(&mut self, data: &[u8], width: u32, height: u32, dx: i32, dy: i32) {
        let expected = width as usize * height as usize * 4;
        if data.len() < expected {
            log::warn!(
                target: "canvas",
                "putImageData skipped: {} bytes for {}x{}",
                data.len(), width, height
            );
            return;
        }

        let canvas_width = self.width as i32;
        let canvas_height = self.height as i32;
        let pixmap_data = self.pixmap.data_mut();

        for sy in 0..height as i32 {
            let dst_row = dy + sy;
            if dst_row < 0 || dst_row >= canvas_height {
                continue;
            }

            for sx in 0..width as i32 {
                let dst_col = dx + sx;
                if dst_col < 0 || dst_col >= canvas_width {
                    continue;
                }

                let src_idx = ((sy as u32 * width + sx as u32) * 4) as usize;
                let dst_idx = ((dst_row * canvas_width + dst_col) * 4) as usize;

                let [pr, pg, pb, a] = premultiply_pixel(&data[src_idx..src_idx + 4]);
                pixmap_data[dst_idx] = pr;
                pixmap_data[dst_idx + 1] = pg;
                pixmap_data[dst_idx + 2] = pb;
                pixmap_data[dst_idx + 3] = a;
            }
        }
    }

    /// Write a whole image at (0, 0), requiring it to match the canvas size.
    pub fn put_image_data_exact(&mut self, image: &CanvasImageDataRef<'_>) -> CanvasResult<()> {
        if image.width != self.width || image.height != self.height {
            return Err(CanvasError::InvalidDimensions {
                width: image.width,
                height: image.height,
            });
        }
        if !image.is_well_formed() {
            return Err(CanvasError::InvalidImageData {
                width: image.width,
                height: image.height,
                expected: image.expected_len(),
                actual: image.data.len(),
            });
        }
        self.put_image_data(image.data, image.width, image.height, 0, 0);
        Ok(())
    }

    /// Export the canvas as PNG data.
    ///
    /// # Arguments
    /// * `ppi` - Optional pixels per inch for PNG metadata. Defaults to 72 if not specified.
    pub fn to_png(&self, ppi: Option<f32>) -> CanvasResult<Vec<u8>> {
        let ppi = ppi.unwrap_or(72.0);

        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            // Set pixel density metadata (pixels per meter)
            let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder.write_header()?;

            // Convert from premultiplied to straight alpha for PNG
            let data = self.get_image_data(0, 0, self.width, self.height);
            writer.write_image_data(&data)?;
        }
        log::debug!(target: "canvas", "encoded {}x{} png ({} bytes)", self.width, self.height, buf.len());
        Ok(buf)
    }
}

/// Convert one straight-alpha RGBA pixel to premultiplied alpha using integer math.
///
/// Formula: (color * alpha + 127) / 255 for proper rounding.
fn premultiply_pixel(px: &[u8]) -> [u8; 4] {
    let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
    match a {
        255 => [r, g, b, a],
        0 => [0, 0, 0, 0],
        _ => {
            let a16 = a as u16;
            [
                ((r as u16 * a16 + 127) / 255) as u8,
                ((g as u16 * a16 + 127) / 255) as u8,
                ((b as u16 * a16 + 127) / 255) as u8,
                a,
            ]
        }
    }
}

fn premultiply_alpha(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4).flat_map(premultiply_pixel).collect()
}
