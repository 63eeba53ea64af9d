//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, proxy handler)
//!     → request.rs (add request ID)
//!     → [upstream resolver picks endpoint]
//!     → headers.rs (strip hop-by-hop, Host)
//!     → [retry client forwards]
//!     → response.rs (JSON errors for local failures)
//!     → Send to client
//! ```

pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use response::{json_error, ErrorBody};
pub use server::HttpServer;
