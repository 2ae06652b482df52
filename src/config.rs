//! Engine configuration.
//!
//! Read from the process environment after loading an optional `.env` file:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `REDDIT_CLIENT_ID` | unset |
//! | `REDDIT_CLIENT_SECRET` | unset |
//! | `REDDIT_USER_AGENT` | `monitor110-research-app` |
//! | `P8_SUBREDDITS` | `stocks,wallstreetbets,investing` |
//! | `P8_POST_LIMIT` | `50` |
//! | `P8_DEFAULT_EMBEDDING` | `sentence-transformers/all-MiniLM-L6-v2` |
//! | `OPENAI_API_KEY` | unset |
//! | `P8_DEDUP_POLICY` | `per-item` |
//! | `P8_DEDUP_THRESHOLD` | `0.15` |

use crate::dedup::{DedupConfig, DedupPolicy, SIMILARITY_THRESHOLD};
use crate::types::{Result, SignalError};
use serde::{Deserialize, Serialize};

/// Default subreddits to monitor.
pub const DEFAULT_SUBREDDITS: [&str; 3] = ["stocks", "wallstreetbets", "investing"];

/// Default listing size per subreddit.
pub const DEFAULT_POST_LIMIT: usize = 50;

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Default Reddit user agent.
pub const DEFAULT_USER_AGENT: &str = "monitor110-research-app";

/// Reddit API credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    /// OAuth application id
    pub client_id: Option<String>,

    /// OAuth application secret
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,

    /// User agent sent with every request
    pub user_agent: String,
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Reddit credentials
    pub reddit: RedditConfig,

    /// Subreddits to monitor, in fetch order
    pub subreddits: Vec<String>,

    /// Listing size per subreddit
    pub post_limit: usize,

    /// Embedding model name
    pub embedding_model: String,

    /// OpenAI API key, for `text-embedding-*` models
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,

    /// Near-duplicate settings
    pub dedup: DedupConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reddit: RedditConfig {
                client_id: None,
                client_secret: None,
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
            subreddits: DEFAULT_SUBREDDITS.iter().map(|s| s.to_string()).collect(),
            post_limit: DEFAULT_POST_LIMIT,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            openai_api_key: None,
            dedup: DedupConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns `SignalError::ConfigError` if a variable is set but unparsable
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let subreddits = match get("P8_SUBREDDITS") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.subreddits,
        };

        let post_limit = match get("P8_POST_LIMIT") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                SignalError::config(format!("Invalid P8_POST_LIMIT '{}': {}", raw, e))
            })?,
            None => DEFAULT_POST_LIMIT,
        };

        let policy = match get("P8_DEDUP_POLICY") {
            Some(raw) => raw.parse::<DedupPolicy>().map_err(SignalError::config)?,
            None => DedupPolicy::default(),
        };

        let threshold = match get("P8_DEDUP_THRESHOLD") {
            Some(raw) => parse_threshold(&raw)?,
            None => SIMILARITY_THRESHOLD,
        };

        Ok(Self {
            reddit: RedditConfig {
                client_id: get("REDDIT_CLIENT_ID"),
                client_secret: get("REDDIT_CLIENT_SECRET"),
                user_agent: get("REDDIT_USER_AGENT").unwrap_or(defaults.reddit.user_agent),
            },
            subreddits,
            post_limit,
            embedding_model: get("P8_DEFAULT_EMBEDDING").unwrap_or(defaults.embedding_model),
            openai_api_key: get("OPENAI_API_KEY"),
            dedup: DedupConfig { threshold, policy },
        })
    }
}

/// Parse a dedup threshold; must be a finite, non-negative number.
pub fn parse_threshold(raw: &str) -> Result<f32> {
    let threshold = raw
        .trim()
        .parse::<f32>()
        .map_err(|e| SignalError::config(format!("Invalid dedup threshold '{}': {}", raw, e)))?;

    if !threshold.is_finite() || threshold < 0.0 {
        return Err(SignalError::config(format!(
            "Dedup threshold must be a finite number >= 0, got {}",
            threshold
        )));
    }

    Ok(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.subreddits, vec!["stocks", "wallstreetbets", "investing"]);
        assert_eq!(config.post_limit, 50);
        assert_eq!(config.embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.reddit.user_agent, "monitor110-research-app");
        assert_eq!(config.dedup, DedupConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("P8_SUBREDDITS", "options, , SecurityAnalysis"),
            ("P8_POST_LIMIT", "25"),
            ("P8_DEFAULT_EMBEDDING", "text-embedding-3-small"),
            ("P8_DEDUP_POLICY", "keep-first"),
            ("P8_DEDUP_THRESHOLD", "0.3"),
            ("REDDIT_CLIENT_ID", "abc"),
            ("REDDIT_CLIENT_SECRET", ""),
        ]))
        .unwrap();

        assert_eq!(config.subreddits, vec!["options", "SecurityAnalysis"]);
        assert_eq!(config.post_limit, 25);
        assert_eq!(config.embedding_model, "text-embedding-3-small");
        assert_eq!(config.dedup.policy, DedupPolicy::KeepFirst);
        assert_eq!(config.dedup.threshold, 0.3);
        assert_eq!(config.reddit.client_id.as_deref(), Some("abc"));
        assert!(config.reddit.client_secret.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup(&[("P8_POST_LIMIT", "many")])).is_err());
        assert!(Config::from_lookup(lookup(&[("P8_DEDUP_POLICY", "random")])).is_err());
        assert!(Config::from_lookup(lookup(&[("P8_DEDUP_THRESHOLD", "-1")])).is_err());
        assert!(Config::from_lookup(lookup(&[("P8_DEDUP_THRESHOLD", "NaN")])).is_err());
    }

    #[test]
    fn test_secrets_not_serialized() {
        let config = Config::from_lookup(lookup(&[
            ("REDDIT_CLIENT_SECRET", "hunter2"),
            ("OPENAI_API_KEY", "sk-secret"),
        ]))
        .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("sk-secret"));
    }
}
