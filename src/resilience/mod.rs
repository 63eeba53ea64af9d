//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → retries.rs (per-attempt timeout, timeout-only retry loop)
//!     → success: response relayed whatever its status
//!     → timeout budget exhausted: terminal FetchError::Timeout
//!     → any other transport error: surfaced on the first attempt
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - Retries fire only on timeouts, with a fixed unjittered delay
//! - Upstream HTTP statuses are never treated as local failures

pub mod retries;

pub use retries::{run_with_retry, FetchError, RetryClient, RetryPolicy};
