//! Dedup outcome with per-item diagnostics.

use crate::dedup::policy::{DedupConfig, DedupPolicy};
use serde::Serialize;

/// An input item removed as a near-duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DroppedItem {
    /// Position of the dropped text in the input
    pub index: usize,

    /// Position of the item it collided with
    pub nearest: usize,

    /// Squared L2 distance between the two embeddings
    pub distance: f32,
}

/// Result of one dedup pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DedupReport {
    /// Surviving texts, in input order
    pub survivors: Vec<String>,

    /// Input positions of the survivors (parallel to `survivors`)
    pub kept: Vec<usize>,

    /// Removed items, in input order
    pub dropped: Vec<DroppedItem>,

    /// Policy that produced this report
    pub policy: DedupPolicy,

    /// Threshold that produced this report
    pub threshold: f32,

    /// Embedding dimensionality, `None` when the embedder was not called
    pub dimensions: Option<usize>,
}

impl DedupReport {
    /// Report for a batch too small to contain duplicates.
    pub(crate) fn passthrough(texts: Vec<String>, config: &DedupConfig) -> Self {
        Self {
            kept: (0..texts.len()).collect(),
            survivors: texts,
            dropped: Vec::new(),
            policy: config.policy,
            threshold: config.threshold,
            dimensions: None,
        }
    }

    /// Number of items removed.
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }

    /// Number of items in the original input.
    pub fn input_len(&self) -> usize {
        self.kept.len() + self.dropped.len()
    }
}
