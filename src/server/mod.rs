//! HTTP API.
//!
//! ## Endpoints
//!
//! - `GET /` - Status check
//! - `GET /signals` - Run the pipeline and return ranked signals
//! - `POST /dedup` - Deduplicate caller-supplied texts and return the report
//!
//! Every request runs inside an `http.request` span with a generated request
//! id, echoed back in the `x-request-id` response header.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::otel::{record_status, request_span};
use crate::pipeline::SignalPipeline;
use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::Instrument;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline behind `/signals`; its deduplicator also serves `/dedup`
    pub pipeline: Arc<SignalPipeline>,
}

impl AppState {
    /// Create new app state.
    pub fn new(pipeline: SignalPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::status))
        .route("/signals", get(handlers::signals))
        .route("/dedup", post(handlers::dedup))
        .layer(middleware::from_fn(trace_request))
        .with_state(state)
}

/// Bind and serve the API until the process is stopped.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound or the server fails
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Signal engine listening");
    axum::serve(listener, router(state)).await
}

/// Wrap each request in a span with a fresh request id.
async fn trace_request(request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let span = request_span(request.method().as_str(), &route, &request_id);
    let mut response = next.run(request).instrument(span.clone()).await;

    record_status(&span, response.status().as_u16());
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
