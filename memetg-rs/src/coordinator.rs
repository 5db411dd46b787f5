//! Owns the current selections and wires them into the compositor.

use crate::art_area::ArtAreaRect;
use crate::background::{BackgroundFile, BackgroundLoader};
use crate::card::CardRecord;
use crate::compositor::CompositeOptions;
use crate::error::MemetgResult;
use crate::image_loading::LoadedImage;
use crate::lookup::{CardSource, ImageSource, SearchOutcome};
use crate::notice::Notice;
use crate::session::{
    save_exported, CardSession, ExportReport, ExportedCard, FetchTicket, Resolution,
};
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of one search action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// Empty or whitespace-only query; no request was made.
    Skipped,
    Found(CardRecord),
    Failed(Notice),
}

/// Snapshot of what the user currently sees.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub card_name: Option<String>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub ready: bool,
    pub background_uri: Option<String>,
    pub art_area: ArtAreaRect,
}

/// Fetch and decode the image a ticket points at.
///
/// Takes the backend by reference so a fetch can outlive later selections;
/// hand the result to [`Coordinator::resolve`] with the same ticket.
pub async fn fetch_card_image<B: ImageSource>(
    backend: &B,
    ticket: &FetchTicket,
) -> MemetgResult<LoadedImage> {
    let relayed = backend.fetch_image(&ticket.url).await?;
    debug!(
        "Fetched {} bytes ({}) for {:?}",
        relayed.bytes.len(),
        relayed.content_type.as_deref().unwrap_or("unknown type"),
        ticket.card_name
    );
    LoadedImage::decode_async(relayed.bytes).await
}

pub struct Coordinator<B> {
    backend: Arc<B>,
    search_result: Option<CardRecord>,
    session: CardSession,
    backgrounds: BackgroundLoader,
}

impl<B> Coordinator<B>
where
    B: CardSource + ImageSource,
{
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, CompositeOptions::default())
    }

    pub fn with_options(backend: B, options: CompositeOptions) -> Self {
        Self {
            backend: Arc::new(backend),
            search_result: None,
            session: CardSession::new(options),
            backgrounds: BackgroundLoader::new(),
        }
    }

    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    pub fn session(&self) -> &CardSession {
        &self.session
    }

    pub fn search_result(&self) -> Option<&CardRecord> {
        self.search_result.as_ref()
    }

    /// Look up a card by name, replacing the previous result wholesale.
    pub async fn search(&mut self, query: &str) -> SearchStatus {
        if query.trim().is_empty() {
            return SearchStatus::Skipped;
        }
        self.search_result = None;

        match self.backend.search(query).await {
            Ok(SearchOutcome::Found(card)) => {
                info!("Found card {:?} for query {:?}", card.name, query);
                self.search_result = Some(card.clone());
                SearchStatus::Found(card)
            }
            Ok(SearchOutcome::NotFound) => SearchStatus::Failed(Notice::CardNotFound),
            Err(err) => {
                error!("Error fetching card: {}", err);
                SearchStatus::Failed(Notice::SearchFailed)
            }
        }
    }

    /// Make `card` the current card. Its image still has to be loaded.
    pub fn select(&mut self, card: CardRecord) -> Option<FetchTicket> {
        self.session.select(card)
    }

    /// Select the card from the last successful search, if any.
    pub fn select_search_result(&mut self) -> Option<FetchTicket> {
        let card = self.search_result.clone()?;
        self.select(card)
    }

    /// Fetch, decode and resolve the image for `ticket`.
    pub async fn load_card_image(&mut self, ticket: &FetchTicket) -> Resolution {
        let loaded = fetch_card_image(self.backend.as_ref(), ticket).await;
        self.resolve(ticket, loaded)
    }

    /// Hand back a fetch started earlier with [`fetch_card_image`].
    pub fn resolve(&mut self, ticket: &FetchTicket, loaded: MemetgResult<LoadedImage>) -> Resolution {
        self.session.resolve(ticket, loaded)
    }

    /// Offer a file as the new background. Non-image files are ignored.
    pub fn choose_background(&mut self, file: BackgroundFile) -> bool {
        self.backgrounds.load(file).is_some()
    }

    pub fn backgrounds(&self) -> &BackgroundLoader {
        &self.backgrounds
    }

    /// Composite the current card with the current background.
    pub async fn export(&self) -> Result<ExportReport, Notice> {
        let background = self.backgrounds.current();
        self.session.export(background.as_deref()).await
    }

    /// Save an exported card into `dir`, returning the written path.
    pub fn save(&self, exported: &ExportedCard, dir: impl AsRef<Path>) -> Result<PathBuf, Notice> {
        save_exported(exported, dir)
    }

    pub fn preview(&self) -> Preview {
        let card = self.session.card();
        Preview {
            card_name: card.map(|c| c.name.clone()),
            type_line: card.map(|c| c.type_line.clone()),
            oracle_text: card.map(|c| c.oracle_text.clone()),
            ready: self.session.is_ready(),
            background_uri: self.backgrounds.preview_uri().map(str::to_string),
            art_area: self.session.options().art_area,
        }
    }
}
