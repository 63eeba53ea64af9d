//! Configuration validation.
//!
//! Semantic checks that serde cannot express: address syntax, value ranges,
//! and cross-field consistency. Validation is a pure function over the parsed
//! config and reports all errors, not just the first one.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address {0:?} is not a valid socket address")]
    InvalidMetricsAddress(String),

    #[error("observability.log_level {0:?} is not one of trace/debug/info/warn/error")]
    InvalidLogLevel(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("retries.timeout_ms must be greater than zero")]
    ZeroAttemptTimeout,

    #[error("limits.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error(
        "inbound timeout ({inbound_ms}ms) is shorter than the worst-case \
         outbound retry schedule ({outbound_ms}ms); upstream calls would be \
         cut off mid-retry"
    )]
    TimeoutBudgetTooSmall { inbound_ms: u64, outbound_ms: u64 },
}

/// Validate a parsed configuration, returning every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    match config.observability.log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        other => errors.push(ValidationError::InvalidLogLevel(other.to_string())),
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.retries.timeout_ms == 0 {
        errors.push(ValidationError::ZeroAttemptTimeout);
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    // Worst case: every attempt times out and every delay is taken.
    let attempts = u64::from(config.retries.max_retries) + 1;
    let outbound_ms = attempts
        .saturating_mul(config.retries.timeout_ms)
        .saturating_add(u64::from(config.retries.max_retries).saturating_mul(config.retries.retry_delay_ms));
    let inbound_ms = config.timeouts.request_secs.saturating_mul(1000);
    if config.timeouts.request_secs > 0 && inbound_ms < outbound_ms {
        errors.push(ValidationError::TimeoutBudgetTooSmall {
            inbound_ms,
            outbound_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.observability.log_level = "loud".into();
        config.limits.max_body_size = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_inbound_timeout_must_cover_retry_schedule() {
        let mut config = ProxyConfig::default();
        // 4 attempts x 30s each plus 3s of delays, against a 10s inbound budget.
        config.timeouts.request_secs = 10;

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::TimeoutBudgetTooSmall { .. }
        ));
    }
}
