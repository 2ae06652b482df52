//! Keyword signal classification.

use crate::types::SignalKind;

/// Keyword rules, checked in order; the first matching rule wins.
const RULES: [(&[&str], SignalKind); 3] = [
    (&["earnings", "results"], SignalKind::EarningsSignal),
    (&["supply chain", "shortage"], SignalKind::RiskSignal),
    (&["acquisition", "merger"], SignalKind::CorporateEvent),
];

/// Assigns a [`SignalKind`] to post text by case-sensitive keyword match.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalExtractor;

impl SignalExtractor {
    /// Create new signal extractor.
    pub fn new() -> Self {
        Self
    }

    /// Classify one text.
    ///
    /// # Returns
    ///
    /// Kind of the first matching rule, or `None` if no keyword matches
    pub fn extract(&self, text: &str) -> Option<SignalKind> {
        RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
            .map(|(_, kind)| *kind)
    }
}
