//! Heuristic signal ranking.

use crate::types::{RankedSignal, Signal, SignalKind};

/// Reddit score that earns the full engagement bonus.
const ENGAGEMENT_CAP: f64 = 1000.0;

/// Scores and orders signals.
///
/// ```text
/// score = 1
///       + 2  if risk_signal
///       + 1  if earnings_signal
///       + min(reddit_score / 1000, 1)
/// ```
///
/// Rounded to two decimals (ties to even), sorted descending. Equal scores keep their input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker;

impl Ranker {
    /// Create new ranker.
    pub fn new() -> Self {
        Self
    }

    /// Score a single signal.
    pub fn score(&self, signal: &Signal) -> f64 {
        let kind_bonus = match signal.kind {
            SignalKind::RiskSignal => 2.0,
            SignalKind::EarningsSignal => 1.0,
            SignalKind::CorporateEvent => 0.0,
        };
        let engagement = (signal.reddit_score as f64 / ENGAGEMENT_CAP).min(1.0);

        round2(1.0 + kind_bonus + engagement)
    }

    /// Score and sort signals, highest first.
    pub fn rank(&self, signals: Vec<Signal>) -> Vec<RankedSignal> {
        let mut ranked: Vec<RankedSignal> = signals
            .into_iter()
            .map(|signal| {
                let score = self.score(&signal);
                RankedSignal::new(signal, score)
            })
            .collect();

        // sort_by is stable
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}

/// Round to two decimals, ties to even on the exact binary value.
///
/// Formatting with a fixed precision rounds the exact value of the float, so
/// `1.125` (exactly representable) becomes `1.12` while `1.135` (stored as
/// slightly above) becomes `1.14`.
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
