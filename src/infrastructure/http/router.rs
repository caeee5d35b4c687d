use crate::infrastructure::http::controllers::{articles, hello, tags, users};
use crate::infrastructure::http::middleware::{ApiError, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello::hello))
        .route("/health", get(hello::health))
        // Articles
        .route(
            "/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/articles/:slug",
            patch(articles::update_article).delete(articles::delete_article),
        )
        .route("/articles/:slug/favorite", post(articles::favorite_article))
        // Users
        .route("/users", post(users::register))
        .route("/users/auth", post(users::login))
        .route(
            "/users/:username/follow",
            post(users::follow).delete(users::unfollow),
        )
        // Tags
        .route("/tags", get(tags::list_tags))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("route".to_string())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
