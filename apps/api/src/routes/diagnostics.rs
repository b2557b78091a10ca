use axum::Json;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::db::DbConn;
use crate::errors::AppError;

const APP_NAME: &str = "Scout API";

/// GET /
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "app": APP_NAME,
        "health": "/health",
        "version": "/version",
        "db_now": "/db/now"
    }))
}

/// GET /version
pub async fn version_handler() -> Json<Value> {
    Json(json!({
        "app": APP_NAME,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /db/now
/// Round-trips to the database on a connection held only for this request.
pub async fn db_now_handler(DbConn(mut conn): DbConn) -> Result<Json<Value>, AppError> {
    let now: DateTime<Utc> = sqlx::query_scalar("SELECT now()")
        .fetch_one(&mut *conn)
        .await?;
    Ok(Json(json!({ "db_now": now.to_rfc3339() })))
}
