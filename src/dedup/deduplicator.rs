//! Embedding-based near-duplicate filter.

use crate::dedup::policy::{DedupConfig, DedupPolicy};
use crate::dedup::report::{DedupReport, DroppedItem};
use crate::embeddings::EmbeddingProvider;
use crate::index::{FlatIndex, Neighbor};
use crate::otel::{record_stage_metrics, stage_span, PipelineStage};
use crate::types::{Result, SignalError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, Instrument};

/// Keep/drop outcome for one input item.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Decision {
    Keep,
    Drop(Neighbor),
}

/// Near-duplicate filter over a batch of texts.
///
/// Holds an injected embedding provider and a fixed configuration. Each call
/// embeds its batch once, builds a fresh [`FlatIndex`], decides every item
/// in input order, and drops the index before returning. Nothing is shared
/// between calls, so one `Deduplicator` can serve concurrent requests as long
/// as its provider can.
///
/// # Example
///
/// ```rust,ignore
/// let dedup = Deduplicator::new(embedder);
/// let unique = dedup.deduplicate(texts).await?;
/// ```
#[derive(Clone)]
pub struct Deduplicator {
    /// Embedding provider
    embedder: Arc<dyn EmbeddingProvider>,

    /// Threshold and policy
    config: DedupConfig,
}

impl Deduplicator {
    /// Create a deduplicator with the default threshold and per-item policy.
    ///
    /// # Arguments
    ///
    /// * `embedder` - Embedding provider used for every call
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_config(embedder, DedupConfig::default())
    }

    /// Create a deduplicator with explicit configuration.
    pub fn with_config(embedder: Arc<dyn EmbeddingProvider>, config: DedupConfig) -> Self {
        Self { embedder, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Embedding provider in use.
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Remove near-duplicate texts.
    ///
    /// # Arguments
    ///
    /// * `texts` - Texts in input order
    ///
    /// # Returns
    ///
    /// Surviving texts, a subsequence of the input in original order.
    /// Inputs of length 0 or 1 come back unchanged without an embedder call.
    ///
    /// # Errors
    ///
    /// - `SignalError::EmbeddingError` if the provider fails or returns the wrong number of vectors
    /// - `SignalError::DimensionMismatch` if the vectors in the batch differ in length
    pub async fn deduplicate(&self, texts: Vec<String>) -> Result<Vec<String>> {
        Ok(self.deduplicate_with_report(texts).await?.survivors)
    }

    /// Remove near-duplicate texts and report what was dropped and why.
    ///
    /// Same contract as [`Deduplicator::deduplicate`].
    pub async fn deduplicate_with_report(&self, texts: Vec<String>) -> Result<DedupReport> {
        if texts.len() <= 1 {
            return Ok(DedupReport::passthrough(texts, &self.config));
        }

        let input_len = texts.len();
        let span = stage_span(PipelineStage::Dedup, self.embedder.model_name());
        let started = Instant::now();

        let report = self.run(texts).instrument(span.clone()).await?;

        record_stage_metrics(
            &span,
            input_len,
            report.survivors.len(),
            Some(started.elapsed().as_millis() as u64),
        );
        span.in_scope(|| {
            info!(
                policy = %report.policy,
                input = input_len,
                kept = report.survivors.len(),
                dropped = report.dropped_count(),
                "Deduplicated batch"
            );
        });

        Ok(report)
    }

    async fn run(&self, texts: Vec<String>) -> Result<DedupReport> {
        let embeddings = self.embed(&texts).await?;
        let index = FlatIndex::build(&embeddings)?;

        let decisions = match self.config.policy {
            DedupPolicy::PerItem => decide_per_item(&index, self.config.threshold)?,
            DedupPolicy::KeepFirst => decide_keep_first(&index, self.config.threshold)?,
        };

        let mut survivors = Vec::with_capacity(texts.len());
        let mut kept = Vec::with_capacity(texts.len());
        let mut dropped = Vec::new();

        for (position, (text, decision)) in texts.into_iter().zip(decisions).enumerate() {
            match decision {
                Decision::Keep => {
                    survivors.push(text);
                    kept.push(position);
                }
                Decision::Drop(nearest) => {
                    debug!(
                        index = position,
                        nearest = nearest.index,
                        distance = nearest.distance,
                        "Dropping near-duplicate"
                    );
                    dropped.push(DroppedItem {
                        index: position,
                        nearest: nearest.index,
                        distance: nearest.distance,
                    });
                }
            }
        }

        Ok(DedupReport {
            survivors,
            kept,
            dropped,
            policy: self.config.policy,
            threshold: self.config.threshold,
            dimensions: Some(index.dim()),
        })
    }

    /// Embed the whole batch in one provider call and check the vector count.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let span = stage_span(PipelineStage::Embed, self.embedder.model_name());
        let started = Instant::now();

        let embeddings = self
            .embedder
            .embed_batch(texts)
            .instrument(span.clone())
            .await?;

        if embeddings.len() != texts.len() {
            return Err(SignalError::embedding(format!(
                "Embedder returned {} vectors for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }

        record_stage_metrics(
            &span,
            texts.len(),
            embeddings.len(),
            Some(started.elapsed().as_millis() as u64),
        );

        Ok(embeddings)
    }
}

/// Stored embedding of the item at `position`.
fn stored(index: &FlatIndex, position: usize) -> Result<&[f32]> {
    index
        .vector(position)
        .ok_or_else(|| SignalError::search(format!("No stored vector at position {}", position)))
}

/// Closest stored vector other than `position` itself.
///
/// The query is a member of the index, so its own entry sits at distance 0;
/// two results always include the nearest other one.
fn nearest_other(index: &FlatIndex, query: &[f32], position: usize) -> Result<Option<Neighbor>> {
    Ok(index
        .search(query, 2)?
        .into_iter()
        .find(|n| n.index != position))
}

/// Each item is kept only if its nearest other item is strictly farther than the threshold.
fn decide_per_item(index: &FlatIndex, threshold: f32) -> Result<Vec<Decision>> {
    (0..index.len())
        .map(|position| {
            let embedding = stored(index, position)?;
            Ok(match nearest_other(index, embedding, position)? {
                Some(nearest) if nearest.distance <= threshold => Decision::Drop(nearest),
                // NaN never compares greater than the threshold either
                Some(nearest) if nearest.distance.is_nan() => Decision::Drop(nearest),
                _ => Decision::Keep,
            })
        })
        .collect()
}

/// Each item is dropped only if an earlier kept item lies within the threshold.
fn decide_keep_first(index: &FlatIndex, threshold: f32) -> Result<Vec<Decision>> {
    let mut kept = vec![false; index.len()];
    let mut decisions = Vec::with_capacity(index.len());

    for position in 0..index.len() {
        let embedding = stored(index, position)?;
        let blocker = index
            .range_search(embedding, threshold)?
            .into_iter()
            .find(|n| n.index < position && kept[n.index]);

        match blocker {
            Some(nearest) => decisions.push(Decision::Drop(nearest)),
            None => {
                kept[position] = true;
                decisions.push(Decision::Keep);
            }
        }
    }

    Ok(decisions)
}
