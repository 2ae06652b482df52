//! Error types for signal engine operations.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `From` implementations.

use thiserror::Error;

/// Comprehensive error type for all signal engine operations.
///
/// Every stage of the pipeline fails fast: an error from the embedder, the
/// index, or the post source aborts the whole pass. No partial results.
#[derive(Error, Debug)]
pub enum SignalError {
    /// Embedding generation failed (model unavailable, inference error, bad response)
    #[error("Embedding generation failed: {0}")]
    EmbeddingError(String),

    /// Vector index build or search failed
    #[error("Vector search failed: {0}")]
    SearchError(String),

    /// Vector length differs from the batch dimensionality
    #[error("Dimension mismatch at vector {index}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Position of the offending vector (or query) in its batch
        index: usize,
        /// Dimensionality of the batch
        expected: usize,
        /// Length of the offending vector
        actual: usize,
    },

    /// Fetching posts from a source failed
    #[error("Ingest failed: {0}")]
    IngestError(String),

    /// Export operation failed
    #[error("Export failed: {0}")]
    ExportError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// HTTP client error (embedding and ingest APIs)
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl SignalError {
    /// Create an embedding error with context.
    ///
    /// # Arguments
    ///
    /// * `msg` - Error message
    ///
    /// # Returns
    ///
    /// `SignalError::EmbeddingError`
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::EmbeddingError(msg.into())
    }

    /// Create a search error with context.
    pub fn search(msg: impl Into<String>) -> Self {
        Self::SearchError(msg.into())
    }

    /// Create an ingest error with context.
    pub fn ingest(msg: impl Into<String>) -> Self {
        Self::IngestError(msg.into())
    }

    /// Create a configuration error with context.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if error is recoverable.
    ///
    /// Only transport-level failures qualify. The engine itself never retries;
    /// this lets a caller (e.g. an HTTP client) decide whether to re-issue the
    /// whole request.
    ///
    /// # Returns
    ///
    /// `true` if the operation can be retried, `false` otherwise
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::HttpError(e) => e.is_timeout() || e.is_connect(),
            Self::IngestError(_) => true,
            _ => false,
        }
    }
}
