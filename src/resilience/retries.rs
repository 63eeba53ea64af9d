//! Retry logic for outbound upstream calls.
//!
//! # Responsibilities
//! - Bound each attempt with a per-attempt timeout
//! - Retry timed-out attempts with a fixed delay between them
//! - Propagate every other failure immediately
//!
//! # Design Decisions
//! - Only transport-level timeouts are retried; DNS failures, refused
//!   connections and TLS errors surface on the first attempt
//! - HTTP error statuses (4xx/5xx) are responses, not failures; they are
//!   returned to the caller untouched and never retried
//! - The delay between attempts is fixed, not exponential, and unjittered
//! - `max_retries = N` means at most N+1 attempts, never unbounded

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Retry behavior for a logical HTTP operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt.
    pub max_retries: u32,

    /// Fixed delay between attempts.
    pub retry_delay: Duration,

    /// Per-attempt timeout; an attempt exceeding it is aborted.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Error type for retried HTTP operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Every attempt exceeded the per-attempt timeout.
    #[error("request timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    /// Non-timeout transport failure (DNS, connection refused, TLS).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The upstream answered with a non-success status. Only produced by
    /// [`RetryClient::fetch_json`]; plain [`RetryClient::execute`] returns
    /// such responses to the caller.
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The upstream body was not valid JSON.
    #[error("invalid JSON in response body: {0}")]
    Json(#[source] reqwest::Error),
}

impl FetchError {
    /// True for the terminal timeout variant.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

/// Drive an operation through the retry schedule of `policy`.
///
/// `op` is invoked once per attempt (0-based attempt index) and must report
/// timeouts as [`FetchError::Timeout`]; any other error aborts the schedule
/// immediately. The per-attempt timeout is the operation's responsibility,
/// which keeps this driver testable without a network.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    for attempt in 0..=policy.max_retries {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_timeout() && attempt < policy.max_retries => {
                tracing::warn!(
                    attempt = attempt + 1,
                    total = policy.max_retries + 1,
                    delay_ms = policy.retry_delay.as_millis() as u64,
                    "attempt timed out, retrying"
                );
                tokio::time::sleep(policy.retry_delay).await;
            }
            Err(err) if err.is_timeout() => {
                return Err(FetchError::Timeout {
                    attempts: policy.max_retries + 1,
                });
            }
            Err(err) => return Err(err),
        }
    }

    // Unreachable: the loop always returns on the final attempt.
    Err(FetchError::Timeout {
        attempts: policy.max_retries + 1,
    })
}

/// An HTTP client with bounded per-attempt latency and timeout-only retries.
#[derive(Debug, Clone)]
pub struct RetryClient {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl RetryClient {
    /// Create a client with the given policy.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            client: reqwest::Client::new(),
            policy,
        }
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// The policy this client runs under.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The underlying `reqwest::Client`, for building requests.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Execute `request`, retrying timed-out attempts.
    ///
    /// Responses are returned whatever their status code. Requests with a
    /// streaming body cannot be cloned for replay and get exactly one
    /// attempt.
    pub async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, FetchError> {
        // Streaming bodies cannot be replayed: one attempt, no retries.
        if request.try_clone().is_none() {
            return self.attempt(request).await;
        }

        run_with_retry(&self.policy, |_attempt| {
            // Clone checked above; bodies here are buffered bytes.
            let req = request.try_clone().expect("request body is replayable");
            self.attempt(req)
        })
        .await
    }

    /// Execute `request` and parse the body as JSON.
    ///
    /// Unlike [`execute`](Self::execute), a non-success status here is an
    /// error carrying the upstream body text.
    pub async fn fetch_json(
        &self,
        request: reqwest::Request,
    ) -> Result<serde_json::Value, FetchError> {
        let response = self.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        response.json().await.map_err(FetchError::Json)
    }

    /// Single bounded attempt. Dropping the in-flight future on timer expiry
    /// aborts the underlying request.
    async fn attempt(&self, request: reqwest::Request) -> Result<reqwest::Response, FetchError> {
        match tokio::time::timeout(self.policy.timeout, self.client.execute(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) if err.is_timeout() => Err(FetchError::Timeout { attempts: 1 }),
            Ok(Err(err)) => Err(FetchError::Transport(err)),
            Err(_elapsed) => Err(FetchError::Timeout { attempts: 1 }),
        }
    }
}
