//! Pure Rust pixel canvas used to composite custom card images.
//!
//! The canvas is a small subset of the Canvas 2D `drawImage` / `getImageData`
//! / `toDataURL("image/png")` surface, backed by `tiny-skia`:
//! - `draw_image_data_scaled` composites a straight-alpha RGBA image onto the
//!   buffer, stretched to a destination rectangle
//! - `put_image_data` writes pixels directly, bypassing compositing
//! - `to_png` encodes the buffer losslessly
//!
//! # Example
//!
//! ```rust,ignore
//! use memetg_canvas::{CanvasContext, CanvasImageDataRef};
//!
//! let mut ctx = CanvasContext::new(672, 936)?;
//! ctx.put_image_data(&card_rgba, 672, 936, 0, 0);
//! let art = CanvasImageDataRef { data: &art_rgba, width: 64, height: 64 };
//! ctx.draw_image_data_scaled(&art, 53.76, 102.96, 564.48, 421.2);
//! let png_data = ctx.to_png(None)?;
//! ```

mod context;
mod drawing_state;
mod error;
mod geometry;
mod style;

// Re-export public API
pub use context::CanvasContext;
pub use drawing_state::DrawingState;
pub use error::{CanvasError, CanvasResult};
pub use geometry::CanvasImageDataRef;
pub use style::ImageSmoothingQuality;
