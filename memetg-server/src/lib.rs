//! HTTP relay for card searches and card images.
//!
//! Two endpoints:
//! - `GET /api/search?name=...` forwards a fuzzy name lookup to the card
//!   database and passes its JSON through.
//! - `GET /api/proxy-image?url=...` fetches an image and returns its bytes
//!   under this server's origin, so pixels drawn from it stay readable.

pub mod config;
pub mod handlers;
pub mod logging;

pub use config::ServeConfig;
pub use logging::{init_tracing, LogFormat};

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use http::{HeaderValue, Method};
use memetg_rs::ScryfallClient;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub upstream: ScryfallClient,
    pub cache_control: HeaderValue,
}

impl AppState {
    pub fn new(config: &ServeConfig) -> anyhow::Result<Self> {
        let cache_control = HeaderValue::from_str(&format!(
            "public, max-age={}",
            config.cache_max_age
        ))?;
        Ok(Self {
            upstream: ScryfallClient::new(config.upstream_url.clone()),
            cache_control,
        })
    }
}

pub fn build_router(config: &ServeConfig) -> anyhow::Result<Router> {
    let state = AppState::new(config)?;

    let mut router = Router::new()
        .route(
            "/api/search",
            get(handlers::search).fallback(handlers::method_not_allowed),
        )
        .route("/api/proxy-image", get(handlers::proxy_image))
        .with_state(state);

    if let Some(origin) = &config.cors_origin {
        let origin = HeaderValue::from_str(origin)
            .with_context(|| format!("Invalid CORS origin: {origin}"))?;
        router = router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET]),
        );
    }

    Ok(router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::new())
            .layer(TimeoutLayer::new(config.request_timeout)),
    ))
}

/// Bind `config.host:config.port` and serve until Ctrl-C.
pub async fn serve(config: ServeConfig) -> anyhow::Result<()> {
    let app = build_router(&config)?;
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    tracing::info!(
        "memetg-server listening on http://{} (upstream {})",
        listener.local_addr()?,
        config.upstream_url
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("memetg-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
