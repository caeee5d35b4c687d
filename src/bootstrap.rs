use crate::application::services::{ArticleService, TagService, TokenService, UserService};
use crate::config::Config;
use crate::domain::ports::article_repository::ArticleRepository;
use crate::domain::ports::tag_repository::TagRepository;
use crate::domain::ports::user_repository::UserRepository;
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::persistence::Database;
use std::sync::Arc;

/// Wire repositories and services together.
pub fn build_app_state(db: Database, config: &Config) -> AppState {
    let tokens = TokenService::new(&config.jwt_secret, config.jwt_ttl_hours);

    let user_repo: Arc<dyn UserRepository> = Arc::new(db.clone());
    let article_repo: Arc<dyn ArticleRepository> = Arc::new(db.clone());
    let tag_repo: Arc<dyn TagRepository> = Arc::new(db.clone());

    let user_service = UserService::new(user_repo, tokens.clone());
    let article_service = ArticleService::new(article_repo);
    let tag_service = TagService::new(tag_repo);
    tracing::debug!("Services initialized");

    AppState {
        db,
        tokens,
        user_service,
        article_service,
        tag_service,
    }
}
