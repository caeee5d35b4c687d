use crate::domain::entities::{LinkOutcome, NewUser, UnlinkOutcome, User, UserFollow};
use crate::infrastructure::http::middleware::error::ApiResult;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. A taken username or email surfaces as a
    /// `BadRequest` naming the column.
    async fn create_user(&self, user: &NewUser) -> ApiResult<User>;

    async fn get_user_by_email(&self, email: &str) -> ApiResult<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> ApiResult<Option<User>>;

    /// Create the follow edge (idempotent)
    async fn follow_user(&self, follow: &UserFollow) -> ApiResult<LinkOutcome>;

    /// Delete the follow edge (idempotent)
    async fn unfollow_user(&self, follow: &UserFollow) -> ApiResult<UnlinkOutcome>;

    async fn is_following(&self, follow: &UserFollow) -> ApiResult<bool>;
}
