//! Percolate Signals - social post signal engine
//!
//! Turns a batch of social posts into ranked market signals:
//! - Text cleaning and keyword spam filtering
//! - Embedding-based near-duplicate suppression over an exact L2 index
//! - Keyword signal classification and heuristic ranking
//!
//! Can be used as:
//! - Standalone Rust library (`Deduplicator`, `SignalPipeline`)
//! - CLI and HTTP service (`signals` binary)

pub mod config;
pub mod dedup;
pub mod embeddings;
pub mod export;
pub mod index;
pub mod ingest;
pub mod otel;
pub mod pipeline;
pub mod server;
pub mod types;

pub use config::Config;
pub use dedup::{DedupConfig, DedupPolicy, DedupReport, Deduplicator, SIMILARITY_THRESHOLD};
pub use embeddings::{EmbeddingProvider, ProviderFactory};
pub use pipeline::{PipelineOutput, SignalPipeline};
pub use types::{Post, RankedSignal, Result, Signal, SignalError, SignalKind};
