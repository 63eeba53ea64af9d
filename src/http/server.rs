//! HTTP server setup and the proxy handler.
//!
//! # Responsibilities
//! - Create the Axum router with the `/api` catch-all handler
//! - Wire up middleware (tracing, inbound timeout, request ID)
//! - Resolve the function name to its configured upstream
//! - Forward method, headers, and body through the retry client
//! - Relay the upstream response verbatim
//! - Render local failures as structured JSON errors

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::http::headers::{forwardable_headers, relayable_headers};
use crate::http::request::RequestIdLayer;
use crate::http::response::json_error;
use crate::observability::metrics;
use crate::resilience::retries::RetryClient;
use crate::upstream::UpstreamResolver;

/// Path prefix identifying proxied function calls.
const API_PREFIX: &str = "/api";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<UpstreamResolver>,
    pub client: RetryClient,
    pub max_body_size: usize,
}

/// HTTP server for the edge proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server resolving upstreams from the process environment.
    pub fn new(config: ProxyConfig) -> Self {
        Self::with_resolver(config, UpstreamResolver::from_env())
    }

    /// Create a server with an explicit resolver (used by tests).
    pub fn with_resolver(config: ProxyConfig, resolver: UpstreamResolver) -> Self {
        let state = AppState {
            resolver: Arc::new(resolver),
            client: RetryClient::new(config.retries.policy()),
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/api", any(proxy_handler))
            .route("/api/", any(proxy_handler))
            .route("/api/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler.
/// Extracts the function name, resolves its upstream, and forwards.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let path = request.uri().path().to_string();
    let method = request.method().clone();

    let Some(function) = function_name(&path) else {
        tracing::warn!(request_id = %request_id, path = %path, "Missing function name");
        metrics::record_request(method.as_str(), 400, "none", start_time);
        return json_error(StatusCode::BAD_REQUEST, "Function name is required", None);
    };
    let function = function.to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        function = %function,
        "Proxying request"
    );

    // 1. Resolve the upstream URL from the environment snapshot.
    let url = match state.resolver.resolve(&function) {
        Ok(url) => url,
        Err(err) => {
            tracing::warn!(request_id = %request_id, function = %function, error = %err, "Unresolvable function");
            metrics::record_request(method.as_str(), 500, &function, start_time);
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                err.to_string(),
                Some(err.hint()),
            );
        }
    };

    // 2. Buffer the body for non-GET/HEAD methods. GET/HEAD forward none.
    let (parts, body) = request.into_parts();
    let body_bytes = if method == Method::GET || method == Method::HEAD {
        None
    } else {
        match axum::body::to_bytes(body, state.max_body_size).await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                tracing::warn!(request_id = %request_id, error = %err, "Failed to buffer request body");
                metrics::record_request(method.as_str(), 413, &function, start_time);
                return json_error(StatusCode::PAYLOAD_TOO_LARGE, err.to_string(), None);
            }
        }
    };

    // 3. Construct the outbound request.
    let mut builder = state
        .client
        .http_client()
        .request(method.clone(), url)
        .headers(forwardable_headers(&parts.headers));
    if let Some(bytes) = body_bytes {
        builder = builder.body(bytes);
    }
    let outbound = match builder.build() {
        Ok(req) => req,
        Err(err) => {
            metrics::record_request(method.as_str(), 500, &function, start_time);
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None);
        }
    };

    // 4. Forward through the retry client and relay the result.
    match state.client.execute(outbound).await {
        Ok(upstream) => {
            let status = upstream.status();
            metrics::record_request(method.as_str(), status.as_u16(), &function, start_time);

            let headers = relayable_headers(upstream.headers());
            let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
            *response.status_mut() = status;
            response.headers_mut().extend(headers);
            response
        }
        Err(err) => {
            tracing::error!(request_id = %request_id, function = %function, error = %err, "Upstream request failed");
            metrics::record_request(method.as_str(), 500, &function, start_time);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None)
        }
    }
}

/// First path segment after the `/api` prefix, if any.
fn function_name(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(API_PREFIX)?;
    let rest = rest.trim_start_matches('/');
    let name = rest.split('/').next().unwrap_or("");
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_name_extraction() {
        assert_eq!(function_name("/api/get_cards"), Some("get_cards"));
        assert_eq!(function_name("/api/analyze_deck/extra"), Some("analyze_deck"));
        assert_eq!(function_name("/api"), None);
        assert_eq!(function_name("/api/"), None);
        assert_eq!(function_name("/other"), None);
    }

    #[test]
    fn test_router_builds_with_defaults() {
        let server = HttpServer::with_resolver(
            ProxyConfig::default(),
            UpstreamResolver::new(Default::default()),
        );
        assert_eq!(server.config().retries.max_retries, 3);
    }
}
