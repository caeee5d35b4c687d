use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::infrastructure::http::middleware::{ApiResult, AppState};

/// GET / - Greeting
pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "hello world" }))
}

/// GET /health - Liveness including one database round-trip
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.db.ping().await?;
    Ok(Json(json!({ "status": "ok" })))
}
