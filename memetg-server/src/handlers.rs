use crate::AppState;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::{header, HeaderValue, StatusCode};
use memetg_rs::{ImageSource, MemetgError};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProxyParams {
    pub url: Option<String>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

pub async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// `GET /api/search?name=...`
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let Some(name) = params.name.filter(|name| !name.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Card name is required");
    };

    match state.upstream.fetch_named(&name).await {
        Ok(card) => (StatusCode::OK, Json(card)).into_response(),
        Err(MemetgError::UpstreamStatus { status, .. }) => {
            warn!("Card lookup for {:?} returned status {}", name, status);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch card data")
        }
        Err(err) => {
            error!("Card lookup for {:?} failed: {}", name, err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// `GET /api/proxy-image?url=...`
pub async fn proxy_image(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> Response {
    let Some(url) = params.url.filter(|url| !url.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "URL parameter is required");
    };

    match state.upstream.fetch_image(&url).await {
        Ok(image) => {
            let content_type = image
                .content_type
                .as_deref()
                .and_then(|value| HeaderValue::from_str(value).ok())
                .unwrap_or(HeaderValue::from_static("application/octet-stream"));
            info!("Relayed {} bytes from {}", image.bytes.len(), url);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, state.cache_control.clone()),
                ],
                image.bytes,
            )
                .into_response()
        }
        Err(MemetgError::UpstreamStatus { status, reason }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            error_response(status, format!("Failed to fetch image: {reason}"))
        }
        Err(err) => {
            error!("Error proxying image {}: {}", url, err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to proxy image")
        }
    }
}
