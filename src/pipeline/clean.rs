//! Post text normalization.

use crate::types::{Result, SignalError};
use regex::Regex;

/// Matches `http(s)://...` and bare `www.` links up to the next whitespace.
const URL_PATTERN: &str = r"(?i)\b(?:https?://|www\.)\S+";

/// Text normalizer applied to every post before filtering.
///
/// Strips URLs, collapses runs of whitespace (newlines included) into single
/// spaces, and trims both ends.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    url: Regex,
}

impl TextCleaner {
    /// Create new text cleaner.
    ///
    /// # Errors
    ///
    /// Returns `SignalError::InternalError` if the URL pattern fails to compile
    pub fn new() -> Result<Self> {
        let url = Regex::new(URL_PATTERN)
            .map_err(|e| SignalError::InternalError(format!("Invalid URL pattern: {}", e)))?;
        Ok(Self { url })
    }

    /// Normalize one text.
    pub fn clean_text(&self, text: &str) -> String {
        let without_urls = self.url.replace_all(text, " ");
        without_urls.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
