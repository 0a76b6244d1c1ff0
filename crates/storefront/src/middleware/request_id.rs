//! Request ID middleware for correlating logs, Sentry events and responses.
//!
//! An `x-request-id` supplied by an upstream proxy is reused when it is short
//! printable ASCII; anything else is replaced with a fresh UUID v4.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LENGTH: usize = 128;

/// Middleware that ensures every request has a request ID.
///
/// The ID is recorded on the `request_id` field of the request span, set as a
/// Sentry tag, and echoed in the response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(accept_upstream_id)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Returns the upstream ID if it is non-empty, bounded and printable.
fn accept_upstream_id(raw: &str) -> Option<&str> {
    let id = raw.trim();
    let printable = id.bytes().all(|b| b.is_ascii_graphic());
    (!id.is_empty() && id.len() <= MAX_REQUEST_ID_LENGTH && printable).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_proxy_ids() {
        assert_eq!(accept_upstream_id("req-123"), Some("req-123"));
        assert_eq!(
            accept_upstream_id(" 8c1f0e52-5d0b-4d8e-9d63-0f3d1f4f2a10 "),
            Some("8c1f0e52-5d0b-4d8e-9d63-0f3d1f4f2a10")
        );
    }

    #[test]
    fn test_rejects_unusable_ids() {
        assert_eq!(accept_upstream_id(""), None);
        assert_eq!(accept_upstream_id("   "), None);
        assert_eq!(accept_upstream_id("has space"), None);
        assert_eq!(accept_upstream_id(&"a".repeat(129)), None);
    }
}
