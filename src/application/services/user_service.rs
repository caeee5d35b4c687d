use crate::{
    application::services::auth_service::{hash_password, verify_password, TokenService},
    domain::entities::*,
    domain::ports::user_repository::UserRepository,
    infrastructure::http::middleware::error::{ApiError, ApiResult},
    infrastructure::observability::metrics,
    shared::utils::normalize_email,
};
use std::sync::Arc;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Email or password is invalid";

/// Registration, login and the follow graph
#[derive(Clone)]
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    tokens: TokenService,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, tokens: TokenService) -> Self {
        Self { user_repo, tokens }
    }

    pub async fn register(&self, request: RegisterUserRequest) -> ApiResult<AuthResponse> {
        let new_user = NewUser {
            username: request.username,
            email: normalize_email(&request.email),
            password_hash: hash_password(&request.password)?,
        };

        let user = self.user_repo.create_user(&new_user).await?;
        metrics::user_registered();

        let token = self.tokens.issue(user.id)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Unknown email and wrong password answer identically.
    pub async fn login(&self, request: LoginRequest) -> ApiResult<AuthResponse> {
        let email = normalize_email(&request.email);

        let user = match self.user_repo.get_user_by_email(&email).await? {
            Some(user) if verify_password(&request.password, &user.password_hash) => user,
            _ => {
                metrics::login_failed();
                tracing::info!("Failed login attempt");
                return Err(ApiError::BadRequest(INVALID_CREDENTIALS_MESSAGE.to_string()));
            }
        };

        let token = self.tokens.issue(user.id)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    async fn require_user_by_username(&self, username: &str) -> ApiResult<User> {
        self.user_repo
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("User {} not found", username)))
    }

    pub async fn follow(&self, follower_id: i64, username: &str) -> ApiResult<LinkOutcome> {
        let target = self.require_user_by_username(username).await?;
        self.user_repo
            .follow_user(&UserFollow {
                following_id: target.id,
                follower_id,
            })
            .await
    }

    pub async fn unfollow(&self, follower_id: i64, username: &str) -> ApiResult<UnlinkOutcome> {
        let target = self.require_user_by_username(username).await?;
        self.user_repo
            .unfollow_user(&UserFollow {
                following_id: target.id,
                follower_id,
            })
            .await
    }
}
