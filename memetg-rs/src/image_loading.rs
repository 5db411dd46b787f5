use crate::error::{MemetgError, MemetgResult};
use log::{debug, error};
use memetg_canvas::CanvasImageDataRef;
use reqwest::{Client, StatusCode};
use tokio::task;

static MEMETG_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

lazy_static! {
    pub(crate) static ref REQWEST_CLIENT: Client = reqwest::ClientBuilder::new()
        .user_agent(MEMETG_USER_AGENT)
        .build()
        .expect("Failed to construct reqwest client");
}

/// Raw image bytes as served by the origin (or by the relay).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// A decoded raster image: straight-alpha RGBA8 pixels at natural size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    rgba: Vec<u8>,
    width: u32,
    height: u32,
}

impl LoadedImage {
    /// Decode PNG, JPEG, GIF, WebP or BMP bytes.
    pub fn decode(bytes: &[u8]) -> MemetgResult<Self> {
        let img = image::load_from_memory(bytes)?;
        let width = img.width();
        let height = img.height();
        debug!("Decoded {}x{} image from {} bytes", width, height, bytes.len());
        Ok(Self {
            rgba: img.to_rgba8().into_raw(),
            width,
            height,
        })
    }

    /// Decode on the blocking pool, completing once the pixels are available.
    pub async fn decode_async(bytes: Vec<u8>) -> MemetgResult<Self> {
        task::spawn_blocking(move || Self::decode(&bytes))
            .await
            .map_err(|err| MemetgError::Internal(format!("image decode task failed: {err}")))?
    }

    /// Build an image from raw RGBA8 pixels, validating the buffer size.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> MemetgResult<Self> {
        if width == 0 || height == 0 || rgba.len() != width as usize * height as usize * 4 {
            return Err(MemetgError::Internal(format!(
                "RGBA buffer of {} bytes does not describe a {}x{} image",
                rgba.len(),
                width,
                height
            )));
        }
        Ok(Self {
            rgba,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub(crate) fn as_image_data(&self) -> CanvasImageDataRef<'_> {
        CanvasImageDataRef {
            data: &self.rgba,
            width: self.width,
            height: self.height,
        }
    }
}

/// GET `url` with `query` and return the body with its content type.
///
/// Any status outside 2xx becomes [`MemetgError::UpstreamStatus`] carrying the
/// status code and its canonical reason phrase.
pub(crate) async fn fetch_image_bytes(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> MemetgResult<RelayedImage> {
    let response = client.get(url).query(query).send().await?;
    let status = response.status();
    let content_type = response
        .headers()
        .get("Content-Type")
        .and_then(|h| h.to_str().ok().map(|c| c.to_string()));

    if !status.is_success() {
        error!(
            "Failed to load image from url {} with status code {:?}",
            url, status
        );
        return Err(upstream_status_error(status));
    }
    let bytes = response.bytes().await?;
    Ok(RelayedImage {
        bytes: bytes.to_vec(),
        content_type,
    })
}

pub(crate) fn upstream_status_error(status: StatusCode) -> MemetgError {
    MemetgError::UpstreamStatus {
        status: status.as_u16(),
        reason: status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string(),
    }
}
