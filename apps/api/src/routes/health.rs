use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus whether a snapshot is currently loaded.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.snapshots.current().ok();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "volunteer-api",
        "snapshot_loaded": snapshot.is_some(),
        "snapshot_version": snapshot.map(|s| s.version),
    }))
}
