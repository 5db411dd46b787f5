//! Card lookup service and image relay clients.
//!
//! Two backends implement both traits:
//! - [`ScryfallClient`] talks to the card database and image hosts directly.
//!   Outside a browser there is no cross-origin pixel restriction, so images
//!   can be fetched straight from their origin.
//! - [`RelayClient`] goes through a running `memetg-server`
//!   (`/api/search` and `/api/proxy-image`).
#![allow(async_fn_in_trait)]

use crate::card::CardRecord;
use crate::error::{MemetgError, MemetgResult};
use crate::image_loading::{fetch_image_bytes, upstream_status_error, RelayedImage, REQWEST_CLIENT};
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};

pub const SCRYFALL_API_URL: &str = "https://api.scryfall.com";

/// Result of a fuzzy card-name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(CardRecord),
    NotFound,
}

/// Fuzzy card-name lookup.
pub trait CardSource {
    async fn search(&self, name: &str) -> MemetgResult<SearchOutcome>;
}

/// Fetches card images as raw bytes.
pub trait ImageSource {
    async fn fetch_image(&self, url: &str) -> MemetgResult<RelayedImage>;
}

/// Direct client for the Scryfall card database.
#[derive(Debug, Clone)]
pub struct ScryfallClient {
    client: Client,
    base_url: String,
}

impl Default for ScryfallClient {
    fn default() -> Self {
        Self::new(SCRYFALL_API_URL)
    }
}

impl ScryfallClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(REQWEST_CLIENT.clone(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fuzzy-match `name` and return the raw card JSON.
    ///
    /// Any non-success status is an error; the body of a failed lookup is
    /// discarded.
    pub async fn fetch_named(&self, name: &str) -> MemetgResult<serde_json::Value> {
        let url = format!("{}/cards/named", self.base_url);
        info!("Looking up card {:?}", name);
        let response = self
            .client
            .get(&url)
            .query(&[("fuzzy", name)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Card lookup for {:?} failed with status {:?}", name, status);
            return Err(upstream_status_error(status));
        }
        Ok(response.json::<serde_json::Value>().await?)
    }
}

impl CardSource for ScryfallClient {
    async fn search(&self, name: &str) -> MemetgResult<SearchOutcome> {
        match self.fetch_named(name).await {
            Ok(value) => Ok(SearchOutcome::Found(serde_json::from_value(value)?)),
            Err(MemetgError::UpstreamStatus { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                Ok(SearchOutcome::NotFound)
            }
            Err(err) => Err(err),
        }
    }
}

impl ImageSource for ScryfallClient {
    async fn fetch_image(&self, url: &str) -> MemetgResult<RelayedImage> {
        debug!("Fetching image directly: {url}");
        fetch_image_bytes(&self.client, url, &[]).await
    }
}

/// Client for the `memetg-server` search and image relay endpoints.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(REQWEST_CLIENT.clone(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl CardSource for RelayClient {
    /// An `error` field in the JSON body means "not found", whatever the status.
    async fn search(&self, name: &str) -> MemetgResult<SearchOutcome> {
        let url = format!("{}/api/search", self.base_url);
        let value = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        if let Some(error) = value.get("error") {
            debug!("Search for {:?} returned error {}", name, error);
            return Ok(SearchOutcome::NotFound);
        }
        Ok(SearchOutcome::Found(serde_json::from_value(value)?))
    }
}

impl ImageSource for RelayClient {
    async fn fetch_image(&self, url: &str) -> MemetgResult<RelayedImage> {
        let relay_url = format!("{}/api/proxy-image", self.base_url);
        debug!("Fetching image through relay: {url}");
        fetch_image_bytes(&self.client, &relay_url, &[("url", url)]).await
    }
}

fn trim_base_url(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}
