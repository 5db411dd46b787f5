#![allow(clippy::uninlined_format_args)]

use clap::Parser;
use memetg_rs::lookup::SCRYFALL_API_URL;
use memetg_server::{init_tracing, serve, LogFormat, ServeConfig};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(version, name = "memetg-server")]
#[command(about = "Relay card searches and card images for memetg", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Card database base URL
    #[arg(long, default_value = SCRYFALL_API_URL)]
    upstream_url: String,

    /// Cache lifetime for relayed images, in seconds
    #[arg(long, default_value_t = 86400)]
    cache_max_age: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Origin allowed to call the API from a browser
    #[arg(long)]
    cors_origin: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format)?;

    let config = ServeConfig {
        host: args.host,
        port: args.port,
        upstream_url: args.upstream_url,
        cache_max_age: args.cache_max_age,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
        cors_origin: args.cors_origin,
    };
    serve(config).await
}
