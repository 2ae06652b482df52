//! Signal pipeline: posts in, ranked signals out.
//!
//! # Stages
//!
//! ```text
//! fetch -> clean -> spam filter -> dedup -> extract -> rank
//! ```
//!
//! Every stage runs inside its own `pipeline.stage` span. A failure in any
//! stage aborts the run; there are no partial outputs.

pub mod clean;
pub mod extract;
pub mod rank;
pub mod spam;

pub use clean::TextCleaner;
pub use extract::SignalExtractor;
pub use rank::Ranker;
pub use spam::{SpamFilter, DEFAULT_SPAM_KEYWORDS};

use crate::dedup::Deduplicator;
use crate::ingest::PostSource;
use crate::otel::{record_stage_metrics, stage_span, PipelineStage};
use crate::types::{Post, RankedSignal, Result, Signal};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, Instrument};

/// Per-stage counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    /// Posts returned by the source
    pub fetched: usize,

    /// Posts with no text left after cleaning
    pub empty: usize,

    /// Posts dropped by the spam filter
    pub spam: usize,

    /// Posts dropped as near-duplicates
    pub duplicates: usize,

    /// Posts matching no signal rule
    pub unclassified: usize,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// Ranked signals, highest score first
    pub signals: Vec<RankedSignal>,

    /// Stage counts
    pub counts: StageCounts,
}

/// End-to-end signal pipeline.
///
/// Stateless between runs: every call to [`SignalPipeline::run`] fetches a
/// fresh batch and deduplicates it against itself only.
pub struct SignalPipeline {
    source: Arc<dyn PostSource>,
    deduplicator: Deduplicator,
    cleaner: TextCleaner,
    spam: SpamFilter,
    extractor: SignalExtractor,
    ranker: Ranker,
}

impl SignalPipeline {
    /// Create pipeline with the default spam keywords.
    ///
    /// # Arguments
    ///
    /// * `source` - Post source
    /// * `deduplicator` - Near-duplicate filter (owns the embedding provider)
    ///
    /// # Errors
    ///
    /// Returns `SignalError::InternalError` if the text cleaner cannot be built
    pub fn new(source: Arc<dyn PostSource>, deduplicator: Deduplicator) -> Result<Self> {
        Ok(Self {
            source,
            deduplicator,
            cleaner: TextCleaner::new()?,
            spam: SpamFilter::default(),
            extractor: SignalExtractor::new(),
            ranker: Ranker::new(),
        })
    }

    /// Replace the spam filter.
    pub fn with_spam_filter(mut self, spam: SpamFilter) -> Self {
        self.spam = spam;
        self
    }

    /// Near-duplicate filter used by this pipeline.
    pub fn deduplicator(&self) -> &Deduplicator {
        &self.deduplicator
    }

    /// Run one full pass.
    ///
    /// # Returns
    ///
    /// Ranked signals plus per-stage counts
    ///
    /// # Errors
    ///
    /// Propagates the first error from the source, the embedder or the index
    pub async fn run(&self) -> Result<PipelineOutput> {
        let mut counts = StageCounts::default();

        let posts = self.fetch().await?;
        counts.fetched = posts.len();

        let posts = self.clean(posts);
        counts.empty = counts.fetched - posts.len();

        let posts = self.drop_spam(posts);
        counts.spam = counts.fetched - counts.empty - posts.len();

        let posts = self.dedup(posts).await?;
        counts.duplicates = counts.fetched - counts.empty - counts.spam - posts.len();

        let signals = self.extract(posts);
        counts.unclassified =
            counts.fetched - counts.empty - counts.spam - counts.duplicates - signals.len();

        let signals = self.rank(signals);

        info!(
            fetched = counts.fetched,
            spam = counts.spam,
            duplicates = counts.duplicates,
            unclassified = counts.unclassified,
            signals = signals.len(),
            "Pipeline run complete"
        );

        Ok(PipelineOutput { signals, counts })
    }

    async fn fetch(&self) -> Result<Vec<Post>> {
        let span = stage_span(PipelineStage::Fetch, self.source.name());
        let started = Instant::now();

        let posts = self.source.fetch_posts().instrument(span.clone()).await?;

        record_stage_metrics(
            &span,
            0,
            posts.len(),
            Some(started.elapsed().as_millis() as u64),
        );
        Ok(posts)
    }

    /// Normalize text; posts left empty are dropped.
    fn clean(&self, posts: Vec<Post>) -> Vec<Post> {
        let span = stage_span(PipelineStage::Clean, "regex");
        let input = posts.len();

        let cleaned: Vec<Post> = posts
            .into_iter()
            .filter_map(|mut post| {
                post.text = self.cleaner.clean_text(&post.text);
                (!post.text.is_empty()).then_some(post)
            })
            .collect();

        record_stage_metrics(&span, input, cleaned.len(), None);
        cleaned
    }

    fn drop_spam(&self, posts: Vec<Post>) -> Vec<Post> {
        let span = stage_span(PipelineStage::SpamFilter, "keywords");
        let input = posts.len();

        let kept: Vec<Post> = posts
            .into_iter()
            .filter(|post| !self.spam.is_spam(&post.text))
            .collect();

        record_stage_metrics(&span, input, kept.len(), None);
        kept
    }

    /// Deduplicate post texts, then map survivors back to their posts by input position.
    async fn dedup(&self, posts: Vec<Post>) -> Result<Vec<Post>> {
        let texts = posts.iter().map(|post| post.text.clone()).collect();
        let report = self.deduplicator.deduplicate_with_report(texts).await?;

        let mut slots: Vec<Option<Post>> = posts.into_iter().map(Some).collect();
        Ok(report
            .kept
            .iter()
            .filter_map(|&position| slots.get_mut(position).and_then(Option::take))
            .collect())
    }

    fn extract(&self, posts: Vec<Post>) -> Vec<Signal> {
        let span = stage_span(PipelineStage::Extract, "keywords");
        let input = posts.len();

        let signals: Vec<Signal> = posts
            .into_iter()
            .filter_map(|post| {
                let kind = self.extractor.extract(&post.text)?;
                Some(Signal {
                    text: post.text,
                    kind,
                    subreddit: post.subreddit,
                    reddit_score: post.score,
                })
            })
            .collect();

        record_stage_metrics(&span, input, signals.len(), None);
        signals
    }

    fn rank(&self, signals: Vec<Signal>) -> Vec<RankedSignal> {
        let span = stage_span(PipelineStage::Rank, "heuristic");
        let input = signals.len();

        let ranked = self.ranker.rank(signals);

        record_stage_metrics(&span, input, ranked.len(), None);
        ranked
    }
}
