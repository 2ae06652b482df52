//! Shared test fixtures: deterministic embedding providers.

#![allow(dead_code)]

use async_trait::async_trait;
use percolate_signals::embeddings::EmbeddingProvider;
use percolate_signals::types::{Result, SignalError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Embedder backed by a fixed text -> vector table.
///
/// Unknown texts are an embedding error, so a test never silently depends on
/// an unplanned vector.
pub struct StubEmbedder {
    table: HashMap<String, Vec<f32>>,
    dimensions: usize,
    calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            table: HashMap::new(),
            dimensions,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.table.insert(text.to_string(), vector);
        self
    }

    /// Number of `embed_batch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        texts
            .iter()
            .map(|text| {
                self.table
                    .get(text)
                    .cloned()
                    .ok_or_else(|| SignalError::embedding(format!("No stub vector for '{}'", text)))
            })
            .collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

/// Embedder that always fails, like an unavailable model.
pub struct FailingEmbedder {
    calls: AtomicUsize,
}

impl FailingEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SignalError::embedding("model unavailable"))
    }

    fn dimensions(&self) -> usize {
        384
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

/// Embedder returning one vector fewer than requested.
pub struct ShortEmbedder;

#[async_trait]
impl EmbeddingProvider for ShortEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().skip(1).map(|_| vec![0.0, 0.0]).collect())
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn model_name(&self) -> &str {
        "short"
    }
}

/// Texts of the Apple/Oil scenario: the first two are near-identical.
pub const APPLE: &str = "Apple reports record earnings";
pub const APPLE_DUP: &str = "Apple reports record earnings!!";
pub const OIL: &str = "Oil prices surge on shortage fears";
pub const MERGER: &str = "Chip makers confirm merger talks";

/// Stub embedder covering the scenario texts.
pub fn scenario_embedder() -> StubEmbedder {
    StubEmbedder::new(3)
        .with(APPLE, vec![0.90, 0.10, 0.00])
        .with(APPLE_DUP, vec![0.88, 0.12, 0.01])
        .with(OIL, vec![0.00, 0.20, 0.95])
        .with(MERGER, vec![0.10, 0.95, 0.10])
}

/// Owned strings from literals.
pub fn strings(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}
