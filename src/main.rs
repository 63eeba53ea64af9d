//! ClashOps edge proxy.
//!
//! A small reverse proxy built with Tokio and Axum that forwards
//! `/api/<function>` requests to externally hosted serverless functions.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────────┐
//!                      │                  EDGE PROXY                     │
//!                      │                                                 │
//!  Client Request      │  ┌─────────┐    ┌──────────────┐               │
//!  ────────────────────┼─▶│  http   │───▶│   upstream   │               │
//!                      │  │ server  │    │   resolver   │               │
//!                      │  └─────────┘    └──────┬───────┘               │
//!                      │                        │ {NAME}_URL env var     │
//!                      │                        ▼                        │
//!  Client Response     │  ┌─────────┐    ┌──────────────┐               │
//!  ◀───────────────────┼──│response │◀───│ retry client │◀──────────────┼── Serverless
//!                      │  │  relay  │    │(timeout-only)│               │    Function
//!                      │  └─────────┘    └──────────────┘               │
//!                      │                                                 │
//!                      │  config · observability · lifecycle            │
//!                      └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use clashops_edge::config::{load_config, ProxyConfig};
use clashops_edge::http::HttpServer;
use clashops_edge::lifecycle::{spawn_signal_listener, Shutdown};
use clashops_edge::observability::{logging, metrics};
use clashops_edge::upstream::UpstreamResolver;

#[derive(Parser)]
#[command(name = "clashops-edge")]
#[command(about = "Edge proxy forwarding /api/<function> to env-configured upstreams")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        max_retries = config.retries.max_retries,
        attempt_timeout_ms = config.retries.timeout_ms,
        "clashops-edge starting"
    );

    let resolver = UpstreamResolver::from_env();
    let functions = resolver.configured_functions();
    if functions.is_empty() {
        tracing::warn!("No {{NAME}}_URL environment variables found; every /api call will fail");
    } else {
        tracing::info!(count = functions.len(), functions = ?functions, "Configured upstreams");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(err) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %err,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    spawn_signal_listener(shutdown.clone());

    let server = HttpServer::with_resolver(config, resolver);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
