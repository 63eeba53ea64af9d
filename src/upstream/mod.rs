//! Upstream endpoint resolution subsystem.
//!
//! Maps the function name taken from the request path to the externally
//! hosted serverless endpoint that actually implements it. Two states per
//! lookup, decided entirely by the environment snapshot: CONFIGURED (the
//! `{NAME}_URL` variable exists) and UNCONFIGURED (it does not).

pub mod resolver;

pub use resolver::{ResolveError, UpstreamResolver};
