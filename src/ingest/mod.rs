//! Post ingestion.
//!
//! Sources:
//! - `RedditSource`: hot listings via the Reddit API
//! - `JsonlSource`: posts from a local JSONL file
//! - `StaticSource`: fixed in-memory posts

pub mod jsonl;
pub mod reddit;

pub use jsonl::JsonlSource;
pub use reddit::RedditSource;

use crate::types::{Post, Result};
use async_trait::async_trait;

/// Source of raw posts for one pipeline run.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch the current batch of posts.
    ///
    /// # Errors
    ///
    /// Any failure aborts the run; sources do not return partial batches
    async fn fetch_posts(&self) -> Result<Vec<Post>>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str;
}

/// Source returning a fixed list of posts.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    posts: Vec<Post>,
}

impl StaticSource {
    /// Create new static source.
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl PostSource for StaticSource {
    async fn fetch_posts(&self) -> Result<Vec<Post>> {
        Ok(self.posts.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
