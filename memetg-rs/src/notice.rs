//! User-visible messages.
//!
//! Every failure path ends in one of these (or in a silent no-op); none of
//! them stop later interaction.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// The lookup service had no match for the query.
    CardNotFound,
    /// The lookup request itself failed.
    SearchFailed,
    /// Export was requested before the card image finished loading.
    NotReady,
    /// The card image could not be fetched or decoded.
    CardImageFailed,
    /// The chosen background could not be decoded; the card exports without it.
    BackgroundFailed,
    /// Composing or encoding the export failed.
    ExportFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::CardNotFound => "Card not found.",
            Notice::SearchFailed => "Error fetching card.",
            Notice::NotReady => "Please wait for the card to fully load.",
            Notice::CardImageFailed => "Could not load the card image for download.",
            Notice::BackgroundFailed => "Could not load your custom background image.",
            Notice::ExportFailed => "Failed to download card. Please try again.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for Notice {}
