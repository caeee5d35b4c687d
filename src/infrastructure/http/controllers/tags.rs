use axum::{extract::State, Json};

use crate::infrastructure::http::middleware::{ApiResult, AppState};

/// GET /tags - Names of tags in use
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let names = state.tag_service.list_names().await?;
    Ok(Json(names))
}
