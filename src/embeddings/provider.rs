//! Embedding provider trait and factory.

use crate::embeddings::openai::OpenAIEmbedder;
use crate::types::{Result, SignalError};
use async_trait::async_trait;
use std::sync::Arc;

/// Embedding provider trait.
///
/// Implementations must be deterministic: the same text always maps to the
/// same vector, and every vector in one batch has the same length. Providers
/// are passed around as `Arc<dyn EmbeddingProvider>` so callers own their
/// lifetime and tests can substitute a stub.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for single text.
    ///
    /// # Arguments
    ///
    /// * `text` - Input text
    ///
    /// # Returns
    ///
    /// Embedding vector
    ///
    /// # Errors
    ///
    /// Returns `SignalError::EmbeddingError` if generation fails
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| SignalError::embedding("No embedding generated"))
    }

    /// Generate embeddings for batch of texts.
    ///
    /// # Arguments
    ///
    /// * `texts` - Input texts
    ///
    /// # Returns
    ///
    /// One embedding vector per input text, in input order
    ///
    /// # Errors
    ///
    /// Returns `SignalError::EmbeddingError` if generation fails
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get embedding dimensionality.
    fn dimensions(&self) -> usize;

    /// Get model name.
    fn model_name(&self) -> &str;
}

/// Factory for creating embedding providers.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create provider from a model name.
    ///
    /// Local models are loaded, and their output dimensionality measured,
    /// before this returns.
    ///
    /// # Arguments
    ///
    /// * `model` - Model name (e.g., "sentence-transformers/all-MiniLM-L6-v2", "text-embedding-3-small")
    /// * `openai_api_key` - API key, required for `text-embedding-*` models
    ///
    /// # Returns
    ///
    /// Shared embedding provider
    ///
    /// # Errors
    ///
    /// Returns `SignalError::ConfigError` if the model needs a missing key or
    /// the crate was built without the `local` feature
    pub async fn from_model(
        model: &str,
        openai_api_key: Option<&str>,
    ) -> Result<Arc<dyn EmbeddingProvider>> {
        if model.starts_with("text-embedding-") {
            let api_key = openai_api_key.ok_or_else(|| {
                SignalError::config("OPENAI_API_KEY environment variable required for OpenAI models")
            })?;
            return Ok(Arc::new(OpenAIEmbedder::new(
                api_key.to_string(),
                model.to_string(),
            )));
        }

        Self::local(model).await
    }

    #[cfg(feature = "local")]
    async fn local(model: &str) -> Result<Arc<dyn EmbeddingProvider>> {
        let embedder = crate::embeddings::local::LocalEmbedder::load(model).await?;
        Ok(Arc::new(embedder))
    }

    #[cfg(not(feature = "local"))]
    async fn local(model: &str) -> Result<Arc<dyn EmbeddingProvider>> {
        Err(SignalError::config(format!(
            "Local model '{}' requested but percolate-signals was built without the `local` feature",
            model
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_openai_requires_key() {
        let result = ProviderFactory::from_model("text-embedding-3-small", None).await;
        assert!(matches!(result, Err(SignalError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_openai_provider_selected() {
        let provider = ProviderFactory::from_model("text-embedding-3-small", Some("sk-test"))
            .await
            .unwrap();
        assert_eq!(provider.model_name(), "text-embedding-3-small");
        assert_eq!(provider.dimensions(), 1536);
    }

    #[cfg(not(feature = "local"))]
    #[tokio::test]
    async fn test_local_requires_feature() {
        let result = ProviderFactory::from_model("sentence-transformers/all-MiniLM-L6-v2", None).await;
        assert!(matches!(result, Err(SignalError::ConfigError(_))));
    }
}
