//! Local sentence-transformer models via embed_anything.

use crate::embeddings::provider::EmbeddingProvider;
use crate::types::{Result, SignalError};
use async_trait::async_trait;
use embed_anything::embed_query;
use embed_anything::embeddings::embed::{Embedder, TextEmbedder};
use embed_anything::embeddings::local::bert::BertEmbedder;
use std::path::PathBuf;
use std::sync::Arc;

/// Local embedding model provider.
///
/// Loads the model once at construction; the instance is the model's owner
/// and dropping it releases the weights.
pub struct LocalEmbedder {
    embedder: Arc<Embedder>,
    model_name: String,
    dimensions: usize,
}

impl LocalEmbedder {
    /// Get model cache directory (~/.p8/models/).
    fn model_cache_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME").map_err(|_| SignalError::embedding("HOME not set"))?;
        let cache_dir = PathBuf::from(home).join(".p8").join("models");

        std::fs::create_dir_all(&cache_dir)
            .map_err(|e| SignalError::embedding(format!("Failed to create cache dir: {}", e)))?;

        Ok(cache_dir)
    }

    /// Load a local embedding model.
    ///
    /// Embeds one sample sentence so `dimensions()` reports what the model
    /// actually produces rather than a per-name guess.
    ///
    /// # Arguments
    ///
    /// * `model_name` - Hugging Face model id (e.g., "sentence-transformers/all-MiniLM-L6-v2")
    ///
    /// # Errors
    ///
    /// Returns `SignalError::EmbeddingError` if the model cannot be loaded or
    /// returns an empty vector
    pub async fn load(model_name: &str) -> Result<Self> {
        if std::env::var("HF_HOME").is_err() {
            let cache_dir = Self::model_cache_dir()?;
            std::env::set_var("HF_HOME", cache_dir);
        }

        tracing::info!(model = model_name, "Loading local embedding model");

        let bert = BertEmbedder::new(model_name.to_string(), None, None).map_err(|e| {
            SignalError::embedding(format!("Failed to load model '{}': {}", model_name, e))
        })?;
        let embedder = Arc::new(Embedder::Text(TextEmbedder::Bert(Box::new(bert))));

        let sample = run_model(&embedder, &[SAMPLE_TEXT]).await?;
        let dimensions = output_dimensions(&sample)?;
        tracing::info!(model = model_name, dimensions, "Local embedding model ready");

        Ok(Self {
            embedder,
            model_name: model_name.to_string(),
            dimensions,
        })
    }
}

/// Sentence embedded once at load time.
const SAMPLE_TEXT: &str = "Quarterly earnings beat expectations";

async fn run_model(embedder: &Embedder, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
    let embeddings = embed_query(texts, embedder, None)
        .await
        .map_err(|e| SignalError::embedding(format!("Embedding failed: {}", e)))?;

    embeddings
        .into_iter()
        .map(|emb| {
            emb.embedding
                .to_dense()
                .map_err(|e| SignalError::embedding(format!("Dense conversion failed: {}", e)))
        })
        .collect()
}

/// Dimensionality of the first vector a model returned.
fn output_dimensions(embeddings: &[Vec<f32>]) -> Result<usize> {
    match embeddings.first().map(Vec::len) {
        Some(dim) if dim > 0 => Ok(dim),
        _ => Err(SignalError::embedding("Model returned no embedding values")),
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let text_refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        run_model(&self.embedder, &text_refs).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
