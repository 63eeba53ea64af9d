//! Structured JSON error responses.
//!
//! Every local failure of the proxy is rendered as
//! `{ "error": string, "hint"?: string }` so callers always get a parseable
//! body. Upstream responses never pass through here; they are relayed as-is.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

/// JSON body for locally generated errors.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Build a JSON error response.
pub fn json_error(
    status: StatusCode,
    error: impl Into<String>,
    hint: Option<String>,
) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.into(),
            hint,
        }),
    )
        .into_response()
}
