//! Keyword spam filter.

/// Phrases marking a post as spam.
pub const DEFAULT_SPAM_KEYWORDS: [&str; 4] = ["buy now", "free money", "pump", "scam"];

/// Case-sensitive substring spam filter.
#[derive(Debug, Clone)]
pub struct SpamFilter {
    keywords: Vec<String>,
}

impl Default for SpamFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SPAM_KEYWORDS)
    }
}

impl SpamFilter {
    /// Create spam filter from a keyword list.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Check whether a text contains any spam keyword.
    pub fn is_spam(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}
