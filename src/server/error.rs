//! Mapping from engine errors to HTTP responses.

use crate::types::SignalError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Handler error; renders as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Create error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<SignalError> for ApiError {
    fn from(err: SignalError) -> Self {
        let status = match &err {
            // Mismatched vectors come from the embedder, never from the caller
            SignalError::IngestError(_)
            | SignalError::EmbeddingError(_)
            | SignalError::DimensionMismatch { .. }
            | SignalError::HttpError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), error = %self.message, "Request failed");
        } else {
            tracing::warn!(status = self.status.as_u16(), error = %self.message, "Request rejected");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
