//! HTTP request instrumentation.

use tracing::{field, span, Level, Span};

/// Create server request span.
///
/// # Arguments
///
/// * `method` - HTTP method
/// * `route` - Matched route template
/// * `request_id` - Generated request id
///
/// # Returns
///
/// Tracing span with request attributes; `http.response.status_code` is filled in later
pub fn request_span(method: &str, route: &str, request_id: &str) -> Span {
    span!(
        Level::INFO,
        "http.request",
        otel.name = %format!("{} {}", method, route),
        otel.kind = "server",
        http.request.method = method,
        http.route = route,
        request.id = request_id,
        http.response.status_code = field::Empty,
    )
}

/// Record the response status on a request span.
pub fn record_status(span: &Span, status: u16) {
    span.record("http.response.status_code", status);
}
