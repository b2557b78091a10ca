use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Liveness probe. Does not touch the database.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "scout-api",
        "store": state.config.store.as_str()
    }))
}
