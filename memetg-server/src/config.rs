use memetg_rs::lookup::SCRYFALL_API_URL;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
    /// Card database the search endpoint forwards to.
    pub upstream_url: String,
    /// `max-age` sent with relayed images, in seconds.
    pub cache_max_age: u64,
    pub request_timeout: Duration,
    /// Origin allowed to call the API from a browser. No CORS headers when unset.
    pub cors_origin: Option<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            upstream_url: SCRYFALL_API_URL.to_string(),
            cache_max_age: 86400,
            request_timeout: Duration::from_secs(30),
            cors_origin: None,
        }
    }
}
