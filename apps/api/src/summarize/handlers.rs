//! Axum route handlers for the summarize API.

use anyhow::anyhow;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::assembler::ResultPayload;
use crate::state::AppState;
use crate::summarize::pipeline;

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub results: ResultPayload,
}

/// POST /api/v1/opportunities/summarize
///
/// Match pipeline plus an LLM-written long-form summary of the top results.
pub async fn handle_summarize(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, AppError> {
    let snapshot = state.snapshots.current()?;

    let final_state = pipeline::run(
        request.query,
        request.limit,
        &snapshot,
        state.summarizer.as_ref(),
    )
    .await?;

    // A Done pipeline always carries both; anything else is a stage bug.
    let results = final_state
        .payload
        .ok_or_else(|| AppError::Internal(anyhow!("summary pipeline finished without results")))?;
    let summary = final_state
        .summary
        .ok_or_else(|| AppError::Internal(anyhow!("summary pipeline finished without a summary")))?;

    Ok(Json(SummarizeResponse { summary, results }))
}
