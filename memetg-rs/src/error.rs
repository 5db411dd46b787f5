use memetg_canvas::CanvasError;

pub type MemetgResult<T> = Result<T, MemetgError>;

#[derive(Debug, thiserror::Error)]
pub enum MemetgError {
    /// The upstream service answered with a non-success status.
    #[error("Upstream request failed with status {status}: {reason}")]
    UpstreamStatus { status: u16, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Invalid data URI: {0}")]
    DataUri(String),

    #[error("Card `{0}` has no image URL")]
    MissingImageUrl(String),

    #[error(transparent)]
    Canvas(#[from] CanvasError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: `{0}`")]
    Internal(String),
}

impl MemetgError {
    /// Upstream status code, if this error carries one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            MemetgError::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
