use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    domain::entities::*,
    infrastructure::http::middleware::{ApiResult, AppState, CurrentUser, ValidatedJson},
};

/// POST /users - Register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterUserRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = state.user_service.register(req).await?;
    Ok(Json(response))
}

/// POST /users/auth - Log in
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = state.user_service.login(req).await?;
    Ok(Json(response))
}

/// POST /users/:username/follow
pub async fn follow(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(username): Path<String>,
) -> ApiResult<StatusCode> {
    state.user_service.follow(user.id, &username).await?;
    Ok(StatusCode::OK)
}

/// DELETE /users/:username/follow
pub async fn unfollow(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(username): Path<String>,
) -> ApiResult<StatusCode> {
    state.user_service.unfollow(user.id, &username).await?;
    Ok(StatusCode::OK)
}
