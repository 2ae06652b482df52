//! Embedding generation with multiple providers.
//!
//! Supports:
//! - Local embeddings via embed_anything (all-MiniLM-L6-v2, 384 dims), behind the `local` feature
//! - OpenAI embeddings (text-embedding-3-small/large)
//!
//! Configuration via environment variables:
//! - P8_DEFAULT_EMBEDDING: Model name (e.g., "text-embedding-3-small")
//! - OPENAI_API_KEY: OpenAI API key (required for OpenAI models)

#[cfg(feature = "local")]
pub mod local;
pub mod openai;
pub mod provider;

#[cfg(feature = "local")]
pub use local::LocalEmbedder;
pub use openai::OpenAIEmbedder;
pub use provider::{EmbeddingProvider, ProviderFactory};
