//! User-chosen background images.

use crate::error::{MemetgError, MemetgResult};
use crate::image_loading::LoadedImage;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A locally selected file together with its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundFile {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl BackgroundFile {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    /// Read a file, declaring its media type from the file extension.
    pub fn from_path(path: impl AsRef<Path>) -> MemetgResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Ok(Self::new(bytes, media_type_for_path(path)))
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Declared media type for a file name, by extension.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// An accepted background, held as a data URI and decoded at most once.
#[derive(Debug)]
pub struct Background {
    data_uri: String,
    decoded: OnceCell<Arc<LoadedImage>>,
}

impl Background {
    fn from_file(file: &BackgroundFile) -> Self {
        let data_uri = format!(
            "data:{};base64,{}",
            file.media_type,
            BASE64.encode(&file.bytes)
        );
        Self {
            data_uri,
            decoded: OnceCell::new(),
        }
    }

    /// The data URI, suitable for an on-screen preview.
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// Decoded pixels, completing once decoding has finished.
    ///
    /// A failed decode is not cached, so a later call tries again.
    pub async fn decoded(&self) -> MemetgResult<Arc<LoadedImage>> {
        self.decoded
            .get_or_try_init(|| async {
                let bytes = data_uri_payload(&self.data_uri)?;
                LoadedImage::decode_async(bytes).await.map(Arc::new)
            })
            .await
            .cloned()
    }

    pub fn is_decoded(&self) -> bool {
        self.decoded.initialized()
    }
}

/// Holds the single active background.
#[derive(Debug, Default)]
pub struct BackgroundLoader {
    current: Option<Arc<Background>>,
}

impl BackgroundLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `file` as the new background.
    ///
    /// Files whose declared type is not `image/*` are ignored without error and
    /// leave the current background in place.
    pub fn load(&mut self, file: BackgroundFile) -> Option<Arc<Background>> {
        if !file.is_image() {
            debug!("Ignoring background file of type {}", file.media_type);
            return None;
        }
        info!(
            "Loaded {} background ({} bytes)",
            file.media_type,
            file.bytes.len()
        );
        // Dropping the old Arc releases its decoded buffer once no export holds it
        let background = Arc::new(Background::from_file(&file));
        self.current = Some(Arc::clone(&background));
        Some(background)
    }

    pub fn current(&self) -> Option<Arc<Background>> {
        self.current.clone()
    }

    pub fn preview_uri(&self) -> Option<&str> {
        self.current.as_deref().map(Background::data_uri)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// Extract the payload of a `data:` URI (base64 or plain text).
fn data_uri_payload(uri: &str) -> MemetgResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| MemetgError::DataUri("missing `data:` prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| MemetgError::DataUri("missing `,` separator".to_string()))?;
    if header.ends_with(";base64") {
        BASE64
            .decode(payload)
            .map_err(|err| MemetgError::DataUri(err.to_string()))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}
