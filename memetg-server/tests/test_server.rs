use axum::body::Body;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use memetg_rs::{CardSource, ImageSource, RelayClient, SearchOutcome};
use memetg_server::{build_router, ServeConfig};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpListener;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-pixels";

async fn fake_named(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("fuzzy").map(String::as_str) {
        Some("lightning bolt") => Json(json!({
            "object": "card",
            "name": "Lightning Bolt",
            "type_line": "Instant",
            "oracle_text": "Lightning Bolt deals 3 damage to any target.",
            "image_uris": {"normal": "https://cards.example/bolt.jpg"}
        }))
        .into_response(),
        Some("boom") => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"object": "error", "status": 404})),
        )
            .into_response(),
    }
}

async fn fake_png() -> Response {
    ([("Content-Type", "image/png")], PNG_BYTES).into_response()
}

async fn fake_non_authoritative() -> Response {
    (
        StatusCode::NON_AUTHORITATIVE_INFORMATION,
        [("Content-Type", "image/png")],
        PNG_BYTES,
    )
        .into_response()
}

async fn fake_untyped() -> Response {
    // Bypass axum's automatic content type
    Response::new(Body::from(PNG_BYTES))
}

/// Serve `app` on an ephemeral port and return its origin.
async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

struct TestRelay {
    origin: String,
    upstream: String,
}

impl TestRelay {
    async fn start() -> Self {
        Self::start_with(ServeConfig::default()).await
    }

    async fn start_with(config: ServeConfig) -> Self {
        let upstream = spawn(
            Router::new()
                .route("/cards/named", get(fake_named))
                .route("/img/bolt.png", get(fake_png))
                .route("/img/cached.png", get(fake_non_authoritative))
                .route("/img/untyped", get(fake_untyped)),
        )
        .await;
        let config = ServeConfig {
            upstream_url: upstream.clone(),
            ..config
        };
        let origin = spawn(build_router(&config).unwrap()).await;
        Self { origin, upstream }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> reqwest::Response {
        reqwest::Client::new()
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .unwrap()
    }
}

async fn error_message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_search_passes_card_through() {
    let relay = TestRelay::start().await;
    let response = relay
        .get("/api/search", &[("name", "lightning bolt")])
        .await;
    assert_eq!(response.status(), 200);

    let card: Value = response.json().await.unwrap();
    assert_eq!(card["name"], "Lightning Bolt");
    assert_eq!(card["object"], "card");
}

#[tokio::test]
async fn test_search_requires_name() {
    let relay = TestRelay::start().await;
    for query in [&[][..], &[("name", "")][..]] {
        let response = relay.get("/api/search", query).await;
        assert_eq!(response.status(), 400);
        assert_eq!(error_message(response).await, "Card name is required");
    }
}

#[tokio::test]
async fn test_search_rejects_other_methods() {
    let relay = TestRelay::start().await;
    let response = reqwest::Client::new()
        .post(relay.url("/api/search?name=bolt"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 405);
    assert_eq!(error_message(response).await, "Method not allowed");
}

#[tokio::test]
async fn test_search_upstream_failure() {
    let relay = TestRelay::start().await;
    for name in ["boom", "no such card"] {
        let response = relay.get("/api/search", &[("name", name)]).await;
        assert_eq!(response.status(), 500);
        assert_eq!(error_message(response).await, "Failed to fetch card data");
    }
}

#[tokio::test]
async fn test_search_transport_failure() {
    let config = ServeConfig {
        // Nothing listens on the discard port
        upstream_url: "http://127.0.0.1:9".to_string(),
        ..ServeConfig::default()
    };
    let origin = spawn(build_router(&config).unwrap()).await;

    let response = reqwest::Client::new()
        .get(format!("{origin}/api/search?name=bolt"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    assert!(error_message(response)
        .await
        .starts_with("HTTP request failed"));
}

#[tokio::test]
async fn test_proxy_requires_url() {
    let relay = TestRelay::start().await;
    let response = relay.get("/api/proxy-image", &[]).await;
    assert_eq!(response.status(), 400);
    assert_eq!(error_message(response).await, "URL parameter is required");
}

#[tokio::test]
async fn test_proxy_relays_bytes() {
    let relay = TestRelay::start().await;
    let image_url = format!("{}/img/bolt.png", relay.upstream);
    let response = relay.get("/api/proxy-image", &[("url", image_url.as_str())]).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(
        response.headers()["cache-control"],
        "public, max-age=86400"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn test_proxy_relays_any_success_status() {
    let relay = TestRelay::start().await;
    let image_url = format!("{}/img/cached.png", relay.upstream);
    let response = relay.get("/api/proxy-image", &[("url", image_url.as_str())]).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(response.bytes().await.unwrap().as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn test_proxy_defaults_content_type() {
    let relay = TestRelay::start_with(ServeConfig {
        cache_max_age: 60,
        ..ServeConfig::default()
    })
    .await;
    let image_url = format!("{}/img/untyped", relay.upstream);
    let response = relay.get("/api/proxy-image", &[("url", image_url.as_str())]).await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "application/octet-stream"
    );
    assert_eq!(response.headers()["cache-control"], "public, max-age=60");
}

#[tokio::test]
async fn test_proxy_mirrors_upstream_status() {
    let relay = TestRelay::start().await;
    let image_url = format!("{}/img/missing.png", relay.upstream);
    let response = relay.get("/api/proxy-image", &[("url", image_url.as_str())]).await;

    assert_eq!(response.status(), 404);
    assert_eq!(
        error_message(response).await,
        "Failed to fetch image: Not Found"
    );
}

#[tokio::test]
async fn test_proxy_unreachable_origin() {
    let relay = TestRelay::start().await;
    let response = relay
        .get("/api/proxy-image", &[("url", "not a url")])
        .await;
    assert_eq!(response.status(), 500);
    assert_eq!(error_message(response).await, "Failed to proxy image");
}

#[tokio::test]
async fn test_cors_origin() {
    let relay = TestRelay::start_with(ServeConfig {
        cors_origin: Some("http://localhost:3000".to_string()),
        request_timeout: Duration::from_secs(5),
        ..ServeConfig::default()
    })
    .await;
    let response = reqwest::Client::new()
        .get(relay.url("/api/search?name=lightning%20bolt"))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_relay_client_round_trip() {
    let relay = TestRelay::start().await;
    let client = RelayClient::new(relay.origin.clone());

    let SearchOutcome::Found(card) = client.search("lightning bolt").await.unwrap() else {
        panic!("expected a card");
    };
    assert_eq!(card.type_line, "Instant");
    assert_eq!(
        client.search("no such card").await.unwrap(),
        SearchOutcome::NotFound
    );

    let image = client
        .fetch_image(&format!("{}/img/bolt.png", relay.upstream))
        .await
        .unwrap();
    assert_eq!(image.bytes, PNG_BYTES);
    assert_eq!(image.content_type.as_deref(), Some("image/png"));
}
