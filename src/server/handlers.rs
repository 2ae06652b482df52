//! Endpoint handlers.

use crate::dedup::{DedupConfig, DedupPolicy, DedupReport, Deduplicator};
use crate::server::{ApiError, AppState};
use crate::types::RankedSignal;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

/// `POST /dedup` body.
#[derive(Debug, Deserialize)]
pub struct DedupRequest {
    /// Texts to deduplicate, in order
    pub texts: Vec<String>,

    /// Policy override for this request
    #[serde(default)]
    pub policy: Option<DedupPolicy>,
}

// ── GET / ───────────────────────────────────────

/// Status check.
pub async fn status() -> Json<Value> {
    Json(json!({ "status": "signal engine running" }))
}

// ── GET /signals ────────────────────────────────

/// Run the pipeline once and return its ranked signals.
pub async fn signals(State(state): State<AppState>) -> Result<Json<Vec<RankedSignal>>, ApiError> {
    let output = state.pipeline.run().await?;
    Ok(Json(output.signals))
}

// ── POST /dedup ─────────────────────────────────

/// Deduplicate caller-supplied texts.
pub async fn dedup(
    State(state): State<AppState>,
    Json(body): Json<DedupRequest>,
) -> Result<Json<DedupReport>, ApiError> {
    // Embedders only accept non-empty strings
    if body.texts.iter().any(|t| t.trim().is_empty()) {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "texts must not contain empty strings",
        ));
    }

    let base = state.pipeline.deduplicator();
    let report = match body.policy {
        Some(policy) if policy != base.config().policy => {
            let config = DedupConfig {
                policy,
                ..*base.config()
            };
            Deduplicator::with_config(base.embedder().clone(), config)
                .deduplicate_with_report(body.texts)
                .await?
        }
        _ => base.deduplicate_with_report(body.texts).await?,
    };

    Ok(Json(report))
}
