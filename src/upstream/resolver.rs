//! Function-name to upstream-URL resolution.
//!
//! # Responsibilities
//! - Derive the environment variable name for a function
//! - Look up and parse the configured upstream URL
//! - Enumerate configured functions for diagnostics
//!
//! # Design Decisions
//! - The environment is snapshotted once at startup; resolution is pure
//!   lookup afterwards and needs no locking
//! - Name derivation: uppercase, `-` normalized to `_`, `_URL` suffix
//!   (`analyze-deck` → `ANALYZE_DECK_URL`)
//! - An unconfigured function is an error the caller can render with an
//!   actionable hint, not a panic

use std::collections::HashMap;

use thiserror::Error;
use url::Url;

/// Suffix appended to the derived variable name.
const ENV_SUFFIX: &str = "_URL";

/// Error type for upstream resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No environment variable maps this function to an upstream.
    #[error("Function URL not found for: {function}")]
    NotConfigured { function: String, env_var: String },

    /// The environment variable exists but does not hold a valid URL.
    #[error("invalid upstream URL in {env_var}: {source}")]
    InvalidUrl {
        env_var: String,
        #[source]
        source: url::ParseError,
    },
}

impl ResolveError {
    /// Actionable hint for the JSON error body.
    pub fn hint(&self) -> String {
        match self {
            ResolveError::NotConfigured { env_var, .. } => {
                format!("Set environment variable: {env_var}")
            }
            ResolveError::InvalidUrl { env_var, .. } => {
                format!("Fix environment variable: {env_var}")
            }
        }
    }
}

/// Immutable snapshot of the environment mapping function names to upstreams.
#[derive(Debug, Clone)]
pub struct UpstreamResolver {
    vars: HashMap<String, String>,
}

impl UpstreamResolver {
    /// Snapshot the process environment.
    pub fn from_env() -> Self {
        Self::new(std::env::vars().collect())
    }

    /// Build a resolver over an explicit variable map.
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    /// Environment variable name expected for `function`.
    pub fn env_var_name(function: &str) -> String {
        let mut name = function.to_uppercase().replace('-', "_");
        name.push_str(ENV_SUFFIX);
        name
    }

    /// Resolve `function` to its configured upstream URL.
    pub fn resolve(&self, function: &str) -> Result<Url, ResolveError> {
        let env_var = Self::env_var_name(function);

        let raw = self
            .vars
            .get(&env_var)
            .ok_or_else(|| ResolveError::NotConfigured {
                function: function.to_string(),
                env_var: env_var.clone(),
            })?;

        Url::parse(raw).map_err(|source| ResolveError::InvalidUrl { env_var, source })
    }

    /// Function names with a configured upstream, lowercased and sorted.
    pub fn configured_functions(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .vars
            .keys()
            .filter_map(|key| key.strip_suffix(ENV_SUFFIX))
            .filter(|stem| !stem.is_empty())
            .map(|stem| stem.to_lowercase())
            .collect();
        names.sort();
        names
    }
}
