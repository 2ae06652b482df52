//! Keep/drop policies and dedup configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Squared-L2 distance at or below which two posts count as near-duplicates.
///
/// Calibrated for normalized sentence embeddings (all-MiniLM-L6-v2).
pub const SIMILARITY_THRESHOLD: f32 = 0.15;

/// How a near-duplicate pair is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// Every item is judged independently against the whole batch: an item
    /// is dropped when its nearest *other* item is within the threshold.
    /// Both members of a duplicate pair are dropped.
    #[default]
    PerItem,

    /// An item is dropped only when an earlier item that was itself kept lies
    /// within the threshold. The first occurrence of each cluster survives.
    KeepFirst,
}

impl DedupPolicy {
    /// Get policy name as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerItem => "per-item",
            Self::KeepFirst => "keep-first",
        }
    }
}

impl fmt::Display for DedupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DedupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-item" | "per_item" => Ok(Self::PerItem),
            "keep-first" | "keep_first" => Ok(Self::KeepFirst),
            other => Err(format!(
                "unknown dedup policy '{}', expected 'per-item' or 'keep-first'",
                other
            )),
        }
    }
}

/// Deduplication configuration.
///
/// Fixed per deduplicator; the dedup operation itself takes no tuning arguments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Inclusive squared-L2 distance bound for near-duplicates
    pub threshold: f32,

    /// Resolution policy for near-duplicate pairs
    pub policy: DedupPolicy,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            threshold: SIMILARITY_THRESHOLD,
            policy: DedupPolicy::default(),
        }
    }
}

impl DedupConfig {
    /// Default threshold with the given policy.
    pub fn with_policy(policy: DedupPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }
}
