//! JSONL file source.
//!
//! One JSON-encoded [`Post`] per line. Blank lines are skipped; any other
//! malformed line fails the whole read with its line number.

use crate::ingest::PostSource;
use crate::types::{Post, Result, SignalError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Post source reading a JSONL file.
pub struct JsonlSource {
    path: PathBuf,
}

impl JsonlSource {
    /// Create new JSONL source.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// Parse JSONL content into posts.
pub fn parse_posts(content: &str) -> Result<Vec<Post>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line)
                .map_err(|e| SignalError::ingest(format!("Invalid post on line {}: {}", number + 1, e)))
        })
        .collect()
}

#[async_trait]
impl PostSource for JsonlSource {
    async fn fetch_posts(&self) -> Result<Vec<Post>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_posts(&content)
    }

    fn name(&self) -> &str {
        "jsonl"
    }
}
