//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! proxy handler produces:
//!     → logging.rs (structured log events, request ID attached)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; request ID flows through every line
//! - Metrics are cheap and optional; no recorder installed means no-ops

pub mod logging;
pub mod metrics;
