//! Per-card state machine: fetch the card image, mark it ready, export.

use crate::background::Background;
use crate::card::CardRecord;
use crate::compositor::{compose, CompositeOptions};
use crate::error::MemetgResult;
use crate::image_loading::LoadedImage;
use crate::notice::Notice;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifies one card-image fetch.
///
/// A ticket is only honoured while its card is still the selected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub card_name: String,
    pub url: String,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    ImageFetching,
    ImageReady,
}

/// What happened when a fetch result was handed back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The card image decoded and the session is ready to export.
    Ready,
    /// Fetch or decode failed; the session stays non-ready.
    Failed(Notice),
    /// A newer card was selected since the ticket was issued; result discarded.
    Stale,
}

/// A file ready to be saved under `filename`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedCard {
    pub filename: String,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// A successful export plus any non-fatal notices raised along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub card: ExportedCard,
    pub notices: Vec<Notice>,
}

#[derive(Debug)]
enum SessionState {
    Idle,
    ImageFetching {
        card: CardRecord,
        ticket: Option<FetchTicket>,
    },
    ImageReady {
        card: CardRecord,
        image: Arc<LoadedImage>,
    },
}

#[derive(Debug)]
pub struct CardSession {
    state: SessionState,
    generation: u64,
    options: CompositeOptions,
}

impl Default for CardSession {
    fn default() -> Self {
        Self::new(CompositeOptions::default())
    }
}

impl CardSession {
    pub fn new(options: CompositeOptions) -> Self {
        Self {
            state: SessionState::Idle,
            generation: 0,
            options,
        }
    }

    pub fn options(&self) -> &CompositeOptions {
        &self.options
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::ImageFetching { .. } => SessionPhase::ImageFetching,
            SessionState::ImageReady { .. } => SessionPhase::ImageReady,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase() == SessionPhase::ImageReady
    }

    pub fn card(&self) -> Option<&CardRecord> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::ImageFetching { card, .. } | SessionState::ImageReady { card, .. } => {
                Some(card)
            }
        }
    }

    /// The decoded card image, once ready.
    pub fn card_image(&self) -> Option<&Arc<LoadedImage>> {
        match &self.state {
            SessionState::ImageReady { image, .. } => Some(image),
            _ => None,
        }
    }

    /// The fetch the session is currently waiting on, if any.
    pub fn pending_ticket(&self) -> Option<&FetchTicket> {
        match &self.state {
            SessionState::ImageFetching { ticket, .. } => ticket.as_ref(),
            _ => None,
        }
    }

    /// Select `card`, discarding whatever was loaded or in flight.
    ///
    /// Returns the ticket for fetching its image, or `None` when the card has
    /// no image URL (the session then never becomes ready for it).
    pub fn select(&mut self, card: CardRecord) -> Option<FetchTicket> {
        self.generation += 1;
        let ticket = match card.preferred_image_url() {
            Some(url) => Some(FetchTicket {
                generation: self.generation,
                card_name: card.name.clone(),
                url: url.to_string(),
            }),
            None => {
                warn!("Card {:?} has no image URL", card.name);
                None
            }
        };
        info!("Selected card {:?}", card.name);
        self.state = SessionState::ImageFetching {
            card,
            ticket: ticket.clone(),
        };
        ticket
    }

    /// Select `card` with an image that is already decoded, skipping the fetch.
    pub fn select_loaded(&mut self, card: CardRecord, image: LoadedImage) {
        self.generation += 1;
        info!(
            "Selected card {:?} with local image ({}x{})",
            card.name,
            image.width(),
            image.height()
        );
        self.state = SessionState::ImageReady {
            card,
            image: Arc::new(image),
        };
    }

    /// Return to Idle, invalidating any outstanding ticket.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.state = SessionState::Idle;
    }

    /// Hand back the outcome of fetching and decoding the image for `ticket`.
    pub fn resolve(&mut self, ticket: &FetchTicket, loaded: MemetgResult<LoadedImage>) -> Resolution {
        let is_current = matches!(
            &self.state,
            SessionState::ImageFetching { ticket: Some(pending), .. }
                if pending.generation == ticket.generation
        );
        if !is_current {
            info!(
                "Discarding stale image for {:?} (generation {})",
                ticket.card_name, ticket.generation
            );
            return Resolution::Stale;
        }

        let image = match loaded {
            Ok(image) => image,
            Err(err) => {
                error!("Failed to load card image {}: {}", ticket.url, err);
                // Stay in ImageFetching without a ticket: visibly non-ready, no retry
                if let SessionState::ImageFetching { ticket, .. } = &mut self.state {
                    *ticket = None;
                }
                return Resolution::Failed(Notice::CardImageFailed);
            }
        };

        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        if let SessionState::ImageFetching { card, .. } = state {
            info!(
                "Card image ready for {:?} ({}x{})",
                card.name,
                image.width(),
                image.height()
            );
            self.state = SessionState::ImageReady {
                card,
                image: Arc::new(image),
            };
        }
        Resolution::Ready
    }

    /// Composite the ready card with `background` and produce the download.
    ///
    /// Each call allocates its own canvas, so overlapping exports do not
    /// interfere. A background that fails to decode is skipped with a
    /// [`Notice::BackgroundFailed`] notice rather than aborting the export.
    pub async fn export(&self, background: Option<&Background>) -> Result<ExportReport, Notice> {
        let SessionState::ImageReady { card, image } = &self.state else {
            warn!("Export requested before the card image was ready");
            return Err(Notice::NotReady);
        };
        let card = card.clone();
        let image = Arc::clone(image);

        let mut notices = Vec::new();
        let background = match background {
            Some(background) => match background.decoded().await {
                Ok(decoded) => Some(decoded),
                Err(err) => {
                    error!("Failed to decode background image: {}", err);
                    notices.push(Notice::BackgroundFailed);
                    None
                }
            },
            None => None,
        };

        match compose(&image, background.as_deref(), &self.options) {
            Ok(result) => {
                let filename = card.custom_filename();
                info!(
                    "Exported {} ({}x{}, {} bytes)",
                    filename,
                    result.width,
                    result.height,
                    result.png.len()
                );
                Ok(ExportReport {
                    card: ExportedCard {
                        filename,
                        png: result.png,
                        width: result.width,
                        height: result.height,
                    },
                    notices,
                })
            }
            Err(err) => {
                error!("Error generating custom card: {}", err);
                Err(Notice::ExportFailed)
            }
        }
    }
}

/// Write an exported card into `dir`, returning the written path.
///
/// Path separators in the filename become `_`, so split cards such as
/// "Fire // Ice" still land directly in `dir`.
pub fn save_exported(exported: &ExportedCard, dir: impl AsRef<Path>) -> Result<PathBuf, Notice> {
    let path = dir.as_ref().join(exported.filename.replace(['/', '\\'], "_"));
    match std::fs::write(&path, &exported.png) {
        Ok(()) => {
            info!("Saved {}", path.display());
            Ok(path)
        }
        Err(err) => {
            error!("Failed to save {}: {}", path.display(), err);
            Err(Notice::ExportFailed)
        }
    }
}
