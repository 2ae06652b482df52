//! Core data types for the signal engine.
//!
//! Defines fundamental types used throughout the system:
//! - `Post`: Raw post from a source
//! - `Signal` / `RankedSignal`: Classified and scored posts
//! - `SignalError`: Error types for all operations
//! - `Result`: Convenient result type alias

pub mod error;
pub mod post;

pub use error::SignalError;
pub use post::{content_id, Post, RankedSignal, Signal, SignalKind};

/// Result type for signal engine operations.
pub type Result<T> = std::result::Result<T, SignalError>;
