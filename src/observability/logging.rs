//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Respect `RUST_LOG` when set, configured level otherwise
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Initialization is idempotent-by-construction: call once from main

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `default_level` applies to this crate and tower-http when `RUST_LOG` is
/// not set.
pub fn init_logging(default_level: &str) {
    let fallback = format!("clashops_edge={default_level},tower_http={default_level}");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
