//! Pipeline stage instrumentation.
//!
//! One INTERNAL span per stage, carrying batch sizes in and out.

use tracing::{field, span, Level, Span};

/// Pipeline stages (maps to `stage.name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Fetch posts from a source
    Fetch,
    /// Normalize post text
    Clean,
    /// Drop spam posts
    SpamFilter,
    /// Embedding generation for a dedup batch
    Embed,
    /// Near-duplicate suppression
    Dedup,
    /// Keyword signal classification
    Extract,
    /// Heuristic scoring and sort
    Rank,
}

impl PipelineStage {
    /// Get stage name as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "ingest.fetch",
            Self::Clean => "text.clean",
            Self::SpamFilter => "filter.spam",
            Self::Embed => "embedding.generate",
            Self::Dedup => "filter.dedup",
            Self::Extract => "signal.extract",
            Self::Rank => "signal.rank",
        }
    }
}

/// Create pipeline stage span.
///
/// # Arguments
///
/// * `stage` - Pipeline stage
/// * `target` - Stage target (source name, model name, etc.)
///
/// # Returns
///
/// Tracing span with stage attributes and empty metric fields
///
/// # Example
///
/// ```rust,ignore
/// let span = stage_span(PipelineStage::Dedup, "all-MiniLM-L6-v2");
/// let _guard = span.enter();
/// ```
pub fn stage_span(stage: PipelineStage, target: &str) -> Span {
    span!(
        Level::INFO,
        "pipeline.stage",
        otel.name = %format!("{} {}", stage.as_str(), target),
        otel.kind = "internal",
        stage.name = stage.as_str(),
        stage.target = target,
        stage.input = field::Empty,
        stage.output = field::Empty,
        stage.duration_ms = field::Empty,
    )
}

/// Record stage metrics on a stage span.
///
/// # Arguments
///
/// * `span` - Span returned by [`stage_span`]
/// * `input` - Items entering the stage
/// * `output` - Items leaving the stage
/// * `duration_ms` - Processing duration in milliseconds (optional)
pub fn record_stage_metrics(span: &Span, input: usize, output: usize, duration_ms: Option<u64>) {
    span.record("stage.input", input);
    span.record("stage.output", output);
    if let Some(duration) = duration_ms {
        span.record("stage.duration_ms", duration);
    }
}
