use crate::application::services::{ArticleService, TagService, TokenService, UserService};
use crate::infrastructure::http::middleware::error::ApiError;
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: TokenService,
    pub user_service: UserService,
    pub article_service: ArticleService,
    pub tag_service: TagService,
}

/// Authenticated caller. Rejects with 401 when the token is missing or invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
}

/// Caller that may be anonymous. A token that is present but invalid is
/// still rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeUser(pub Option<i64>);

impl MaybeUser {
    pub fn id(&self) -> Option<i64> {
        self.0
    }
}

/// Token from `Authorization: Bearer <token>` (or `Token <token>`).
/// `Ok(None)` when the header is absent.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| ApiError::Unauthorized)?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    Ok(Some(token))
}

fn viewer_from_headers(headers: &HeaderMap, tokens: &TokenService) -> Result<Option<i64>, ApiError> {
    match bearer_token(headers)? {
        Some(token) => tokens.verify(token).map(Some),
        None => Ok(None),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(existing) = parts.extensions.get::<Self>() {
            return Ok(*existing);
        }

        let id = viewer_from_headers(&parts.headers, &state.tokens)?.ok_or(ApiError::Unauthorized)?;
        let user = Self { id };

        parts.extensions.insert(user);
        Ok(user)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let viewer = viewer_from_headers(&parts.headers, &state.tokens)?;
        Ok(Self(viewer))
    }
}
