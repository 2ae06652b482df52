//! Post and signal data structures.
//!
//! A `Post` is what a source hands us. A `Signal` is a classified survivor of
//! the filter stages, and a `RankedSignal` is a signal with its heuristic score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw social-media post as fetched from a source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Post text (title and body joined)
    pub text: String,

    /// Community the post was fetched from
    pub subreddit: String,

    /// Net upvote score at fetch time
    #[serde(default)]
    pub score: i64,

    /// Creation time reported by the source, if any
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a post without a creation timestamp.
    pub fn new(text: impl Into<String>, subreddit: impl Into<String>, score: i64) -> Self {
        Self {
            text: text.into(),
            subreddit: subreddit.into(),
            score,
            created_at: None,
        }
    }
}

/// Coarse topical category assigned by keyword matching.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Earnings or results announcements
    EarningsSignal,
    /// Supply chain disruptions and shortages
    RiskSignal,
    /// Mergers and acquisitions
    CorporateEvent,
}

impl SignalKind {
    /// Get kind as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EarningsSignal => "earnings_signal",
            Self::RiskSignal => "risk_signal",
            Self::CorporateEvent => "corporate_event",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified post, ready for ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signal {
    /// Cleaned post text
    pub text: String,

    /// Signal category
    #[serde(rename = "type")]
    pub kind: SignalKind,

    /// Source community
    pub subreddit: String,

    /// Source post score
    pub reddit_score: i64,
}

/// Signal with its heuristic score and a content id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedSignal {
    /// First 16 hex chars of the BLAKE3 hash of `text`
    pub id: String,

    /// Cleaned post text
    pub text: String,

    /// Signal category
    #[serde(rename = "type")]
    pub kind: SignalKind,

    /// Source community
    pub subreddit: String,

    /// Source post score
    pub reddit_score: i64,

    /// Heuristic score, rounded to two decimals
    pub score: f64,
}

impl RankedSignal {
    /// Attach a score to a signal, deriving its content id.
    pub fn new(signal: Signal, score: f64) -> Self {
        Self {
            id: content_id(&signal.text),
            text: signal.text,
            kind: signal.kind,
            subreddit: signal.subreddit,
            reddit_score: signal.reddit_score,
            score,
        }
    }
}

/// Stable short id for a piece of text.
pub fn content_id(text: &str) -> String {
    let hash = blake3::hash(text.as_bytes());
    hash.to_hex().as_str()[..16].to_string()
}
