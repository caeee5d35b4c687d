use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    domain::entities::*,
    infrastructure::http::middleware::{
        ApiResult, AppState, CurrentUser, MaybeUser, ValidatedJson, ValidatedQuery,
    },
};

/// GET /articles - Newest-first listing with optional filters
pub async fn list_articles(
    State(state): State<AppState>,
    viewer: MaybeUser,
    ValidatedQuery(query): ValidatedQuery<ListArticlesQuery>,
) -> ApiResult<Json<Vec<ArticleResponse>>> {
    let articles = state.article_service.list(query, viewer.id()).await?;
    Ok(Json(articles))
}

/// POST /articles - Publish
pub async fn create_article(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateArticleRequest>,
) -> ApiResult<Json<ArticleResponse>> {
    let article = state.article_service.create(user.id, req).await?;
    Ok(Json(article))
}

/// PATCH /articles/:slug - Partial update by the author
pub async fn update_article(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(slug): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateArticleRequest>,
) -> ApiResult<Json<ArticleResponse>> {
    let article = state.article_service.update(user.id, &slug, req).await?;
    Ok(Json(article))
}

/// DELETE /articles/:slug - Delete by the author
pub async fn delete_article(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    state.article_service.delete(user.id, &slug).await?;
    Ok(StatusCode::OK)
}

/// POST /articles/:slug/favorite - Set or clear the caller's favorite
pub async fn favorite_article(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(slug): Path<String>,
    ValidatedJson(req): ValidatedJson<FavoriteRequest>,
) -> ApiResult<StatusCode> {
    state
        .article_service
        .set_favorite(user.id, &slug, req.favorite)
        .await?;
    Ok(StatusCode::OK)
}
