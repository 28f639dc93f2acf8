//! Axum route handlers for the matching API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::assembler::ResultPayload;
use crate::matching::find_opportunities;
use crate::models::opportunity::Opportunity;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    /// Free-text query. May be empty — that is a valid request and yields
    /// the unscored fallback list.
    pub query: String,
    /// Result limit; clamped to [1, 25], default 8.
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ListedOpportunity {
    pub id: String,
    #[serde(flatten)]
    pub record: Opportunity,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub count: usize,
    pub opportunities: Vec<ListedOpportunity>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub version: u64,
    pub opportunities: usize,
    pub skill_terms: usize,
    pub interest_terms: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/opportunities/match
///
/// Runs the full matching pipeline against the current snapshot. Answers 503
/// when no snapshot is loaded so callers can tell "system not ready" apart
/// from "no matches".
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<ResultPayload>, AppError> {
    let snapshot = state.snapshots.current()?;
    Ok(Json(find_opportunities(
        &snapshot,
        &request.query,
        request.limit,
    )))
}

/// GET /api/v1/opportunities
///
/// All records in stable id order — a diagnostics surface, not a search.
pub async fn handle_list_opportunities(
    State(state): State<AppState>,
) -> Result<Json<ListResponse>, AppError> {
    let snapshot = state.snapshots.current()?;
    let opportunities: Vec<ListedOpportunity> = snapshot
        .store
        .all()
        .map(|(id, record)| ListedOpportunity {
            id: id.to_string(),
            record: record.clone(),
        })
        .collect();

    Ok(Json(ListResponse {
        count: opportunities.len(),
        opportunities,
    }))
}

/// GET /api/v1/opportunities/:id
pub async fn handle_get_opportunity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListedOpportunity>, AppError> {
    let snapshot = state.snapshots.current()?;
    let record = snapshot
        .store
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Opportunity {id} not found")))?;

    Ok(Json(ListedOpportunity { id, record }))
}

/// POST /api/v1/snapshot/reload
///
/// Rebuilds the snapshot from disk (after an external re-ingestion) and
/// swaps it in atomically. In-flight queries keep the snapshot they started
/// with.
pub async fn handle_reload_snapshot(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let snapshot = state
        .snapshots
        .reload_from(&state.config.opportunities_dir, &state.config.index_dir)
        .map_err(AppError::Internal)?;

    Ok(Json(ReloadResponse {
        version: snapshot.version,
        opportunities: snapshot.store.len(),
        skill_terms: snapshot.skills.term_count(),
        interest_terms: snapshot.interests.term_count(),
    }))
}
