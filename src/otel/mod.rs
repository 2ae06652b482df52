//! Tracing instrumentation for the signal engine.
//!
//! Span attributes follow OpenTelemetry naming so a `tracing-opentelemetry`
//! layer can export them unchanged:
//!
//! **Span naming**: `{stage.name} {target}`
//! - Example: `filter.dedup text-embedding-3-small`, `ingest.fetch reddit`
//!
//! **Attributes**:
//! - `stage.name`, `stage.target`: Always set
//! - `stage.input`, `stage.output`, `stage.duration_ms`: Recorded when the stage finishes
//!
//! HTTP requests get a `SERVER` span with `http.request.method`, `http.route`
//! and a generated `request.id`.
//!
//! # Example
//!
//! ```rust,ignore
//! use percolate_signals::otel::{stage_span, record_stage_metrics, PipelineStage};
//!
//! let span = stage_span(PipelineStage::SpamFilter, "keywords");
//! let kept = filter.retain(posts);
//! record_stage_metrics(&span, before, kept.len(), None);
//! ```

pub mod http;
pub mod stage;

pub use http::{record_status, request_span};
pub use stage::{record_stage_metrics, stage_span, PipelineStage};
