//! Reddit listing source.
//!
//! Uses application-only OAuth (client credentials grant), then pulls the
//! `hot` listing of each configured subreddit. Only self posts with a body
//! are kept; link posts carry no text worth classifying.

use crate::config::RedditConfig;
use crate::ingest::PostSource;
use crate::types::{Post, Result, SignalError};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE_URL: &str = "https://oauth.reddit.com";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// `GET /r/{sub}/hot` response.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    data: Submission,
}

#[derive(Debug, Deserialize)]
struct Submission {
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    created_utc: Option<f64>,
}

/// Post source backed by the Reddit API.
pub struct RedditSource {
    config: RedditConfig,
    subreddits: Vec<String>,
    post_limit: usize,
    client: Client,
}

impl RedditSource {
    /// Create new Reddit source.
    ///
    /// # Arguments
    ///
    /// * `config` - OAuth credentials and user agent
    /// * `subreddits` - Subreddits to read, in order
    /// * `post_limit` - Listing size per subreddit
    pub fn new(config: RedditConfig, subreddits: Vec<String>, post_limit: usize) -> Self {
        Self {
            config,
            subreddits,
            post_limit,
            client: Client::new(),
        }
    }

    /// Exchange client credentials for an application-only bearer token.
    async fn access_token(&self) -> Result<String> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or_else(|| SignalError::config("REDDIT_CLIENT_ID not set"))?;
        let client_secret = self
            .config
            .client_secret
            .as_deref()
            .ok_or_else(|| SignalError::config("REDDIT_CLIENT_SECRET not set"))?;

        let response = self
            .client
            .post(TOKEN_URL)
            .basic_auth(client_id, Some(client_secret))
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| SignalError::ingest(format!("Reddit token request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SignalError::ingest(format!(
                "Reddit token request rejected ({})",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SignalError::ingest(format!("Failed to parse Reddit token: {}", e)))?;

        Ok(token.access_token)
    }

    async fn fetch_subreddit(&self, token: &str, subreddit: &str) -> Result<Vec<Post>> {
        let url = format!("{}/r/{}/hot", API_BASE_URL, subreddit);
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .query(&[("limit", self.post_limit)])
            .send()
            .await
            .map_err(|e| SignalError::ingest(format!("Reddit listing r/{} failed: {}", subreddit, e)))?;

        if !response.status().is_success() {
            return Err(SignalError::ingest(format!(
                "Reddit listing r/{} returned {}",
                subreddit,
                response.status()
            )));
        }

        let listing: Listing = response.json().await.map_err(|e| {
            SignalError::ingest(format!("Failed to parse r/{} listing: {}", subreddit, e))
        })?;

        Ok(posts_from_listing(subreddit, listing))
    }
}

/// Convert a listing into posts, skipping submissions without a body.
fn posts_from_listing(subreddit: &str, listing: Listing) -> Vec<Post> {
    listing
        .data
        .children
        .into_iter()
        .map(|thing| thing.data)
        .filter(|submission| !submission.selftext.is_empty())
        .map(|submission| Post {
            text: format!("{} {}", submission.title, submission.selftext),
            subreddit: subreddit.to_string(),
            score: submission.score,
            created_at: submission
                .created_utc
                .and_then(|secs| DateTime::from_timestamp(secs as i64, 0)),
        })
        .collect()
}

#[async_trait]
impl PostSource for RedditSource {
    async fn fetch_posts(&self) -> Result<Vec<Post>> {
        let token = self.access_token().await?;

        let mut posts = Vec::new();
        for subreddit in &self.subreddits {
            let mut batch = self.fetch_subreddit(&token, subreddit).await?;
            tracing::debug!(subreddit = %subreddit, posts = batch.len(), "Fetched listing");
            posts.append(&mut batch);
        }

        Ok(posts)
    }

    fn name(&self) -> &str {
        "reddit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_posts_from_listing() {
        let listing: Listing = serde_json::from_value(json!({
            "kind": "Listing",
            "data": {
                "children": [
                    {"kind": "t3", "data": {
                        "title": "Apple reports record earnings",
                        "selftext": "Revenue up 8% year over year",
                        "score": 1520,
                        "created_utc": 1700000000.0
                    }},
                    {"kind": "t3", "data": {
                        "title": "Link post",
                        "selftext": "",
                        "score": 99
                    }}
                ]
            }
        }))
        .unwrap();

        let posts = posts_from_listing("stocks", listing);
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].text,
            "Apple reports record earnings Revenue up 8% year over year"
        );
        assert_eq!(posts[0].subreddit, "stocks");
        assert_eq!(posts[0].score, 1520);
        assert_eq!(posts[0].created_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let source = RedditSource::new(
            RedditConfig {
                client_id: None,
                client_secret: None,
                user_agent: "test".to_string(),
            },
            vec!["stocks".to_string()],
            10,
        );

        let err = source.fetch_posts().await.unwrap_err();
        assert!(matches!(err, SignalError::ConfigError(_)));
    }
}
