//! Header hygiene for forwarded requests and relayed responses.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions (RFC 9110 §7.6.1)
//! - Drop `Host` so the client's authority never reaches the upstream
//! - Drop framing headers the HTTP stack recomputes per hop
//!
//! # Design Decisions
//! - Everything not explicitly stripped passes untouched; the proxy is
//!   transparent, not a header rewriter

use axum::http::header::{HeaderMap, HeaderName, CONTENT_LENGTH, HOST};

/// Hop-by-hop headers that never cross the proxy.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Headers safe to forward to the upstream.
///
/// `Host` and `Content-Length` are also removed: the outbound client derives
/// both from the resolved upstream URL and the forwarded body.
pub fn forwardable_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if is_hop_by_hop(name) || *name == HOST || *name == CONTENT_LENGTH {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Headers safe to relay from the upstream response.
///
/// The body is re-framed on the client-facing hop, so `Content-Length` is
/// dropped along with the hop-by-hop set; everything else passes verbatim.
pub fn relayable_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if is_hop_by_hop(name) || *name == CONTENT_LENGTH {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}
