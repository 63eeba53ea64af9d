//! Edge proxy for environment-configured serverless function upstreams.
//!
//! Requests arriving at `/api/<function-name>` are forwarded to the upstream
//! URL held in the `{FUNCTION_NAME}_URL` environment variable, through an
//! HTTP client that bounds each attempt with a timeout and retries only on
//! timeouts.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resilience::{FetchError, RetryClient, RetryPolicy};
pub use upstream::UpstreamResolver;
