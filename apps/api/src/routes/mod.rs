pub mod health;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::matching::handlers as matching;
use crate::state::AppState;
use crate::summarize::handlers as summarize;

/// GET /
/// Root status document pointing at the API surface.
async fn root_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Volunteer opportunity matching API",
        "api": "/api/v1"
    }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/opportunities", get(matching::handle_list_opportunities))
        .route("/api/v1/opportunities/:id", get(matching::handle_get_opportunity))
        .route("/api/v1/opportunities/match", post(matching::handle_match))
        // Summarizer collaborator
        .route(
            "/api/v1/opportunities/summarize",
            post(summarize::handle_summarize),
        )
        // Snapshot lifecycle (triggered after external re-ingestion)
        .route("/api/v1/snapshot/reload", post(matching::handle_reload_snapshot))
        .with_state(state)
}
