// Allow uninlined format args for cleaner error messages
#![allow(clippy::uninlined_format_args)]
//! Search a trading-card database, load a custom background image and
//! composite it into the card's artwork region.
//!
//! The pieces, leaf first:
//! - [`card::CardRecord`] and [`art_area::ArtAreaRect`]: the data model
//! - [`lookup`]: the card lookup service and image relay clients
//! - [`background::BackgroundLoader`]: local background files as data URIs
//! - [`compositor::compose`]: draw the card, overlay the background, encode PNG
//! - [`session::CardSession`]: the per-card fetch/ready/export state machine
//! - [`coordinator::Coordinator`]: owns the selections and wires them together

pub mod art_area;
pub mod background;
pub mod card;
pub mod compositor;
pub mod coordinator;
pub mod error;
pub mod image_loading;
pub mod lookup;
pub mod notice;
pub mod session;

#[macro_use]
extern crate lazy_static;

pub use art_area::{ArtAreaRect, PixelRect};
pub use background::{Background, BackgroundFile, BackgroundLoader};
pub use card::{custom_filename, CardRecord, ImageUris};
pub use compositor::{compose, CompositeOptions, CompositeResult};
pub use coordinator::{Coordinator, Preview, SearchStatus};
pub use error::{MemetgError, MemetgResult};
pub use image_loading::{LoadedImage, RelayedImage};
pub use lookup::{CardSource, ImageSource, RelayClient, ScryfallClient, SearchOutcome};
pub use memetg_canvas::ImageSmoothingQuality;
pub use notice::Notice;
pub use session::{
    save_exported, CardSession, ExportReport, ExportedCard, FetchTicket, Resolution, SessionPhase,
};
