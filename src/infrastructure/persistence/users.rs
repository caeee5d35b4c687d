use crate::domain::entities::{LinkOutcome, NewUser, UnlinkOutcome, User, UserFollow};
use crate::domain::ports::user_repository::UserRepository;
use crate::infrastructure::http::middleware::error::{ApiError, ApiResult};
use crate::infrastructure::persistence::{now_timestamp, unique_violation_message, Database};
use async_trait::async_trait;
use sqlx::{any::AnyRow, Row};

fn user_from_row(row: &AnyRow) -> ApiResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Turn a unique violation on `"user"` into the message the client sees.
fn map_user_conflict(err: sqlx::Error) -> ApiError {
    match unique_violation_message(&err) {
        Some(message) if message.contains("username") => {
            ApiError::BadRequest("Username is already taken".to_string())
        }
        Some(message) if message.contains("email") => {
            ApiError::BadRequest("Email is already taken".to_string())
        }
        _ => err.into(),
    }
}

// Internal helpers
impl Database {
    pub(crate) async fn create_user_internal<'e, E>(
        &self,
        executor: E,
        user: &NewUser,
    ) -> ApiResult<User>
    where
        E: sqlx::Executor<'e, Database = sqlx::Any>,
    {
        let now = now_timestamp();

        let row = sqlx::query(
            "INSERT INTO \"user\" (username, email, password, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&now)
        .bind(&now)
        .fetch_one(executor)
        .await
        .map_err(map_user_conflict)?;

        let id: i64 = row.try_get("id")?;
        tracing::info!("User created: id={}, username={}", id, user.username);

        Ok(User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    async fn get_user_where(&self, column: &str, value: &str) -> ApiResult<Option<User>> {
        let sql = format!(
            "SELECT id, username, email, password, created_at, updated_at
             FROM \"user\"
             WHERE {} = ?",
            column
        );

        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }
}

#[async_trait]
impl UserRepository for Database {
    async fn create_user(&self, user: &NewUser) -> ApiResult<User> {
        self.create_user_internal(&self.pool, user).await
    }

    async fn get_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        self.get_user_where("email", email).await
    }

    async fn get_user_by_username(&self, username: &str) -> ApiResult<Option<User>> {
        self.get_user_where("username", username).await
    }

    async fn follow_user(&self, follow: &UserFollow) -> ApiResult<LinkOutcome> {
        let result = sqlx::query(
            "INSERT INTO userFollow (following_id, follower_id)
             VALUES (?, ?)
             ON CONFLICT DO NOTHING",
        )
        .bind(follow.following_id)
        .bind(follow.follower_id)
        .execute(&self.pool)
        .await?;

        let outcome = LinkOutcome::from_rows_affected(result.rows_affected());
        tracing::debug!(
            "Follow: follower={}, following={}, outcome={:?}",
            follow.follower_id,
            follow.following_id,
            outcome
        );
        Ok(outcome)
    }

    async fn unfollow_user(&self, follow: &UserFollow) -> ApiResult<UnlinkOutcome> {
        let result = sqlx::query(
            "DELETE FROM userFollow
             WHERE following_id = ? AND follower_id = ?",
        )
        .bind(follow.following_id)
        .bind(follow.follower_id)
        .execute(&self.pool)
        .await?;

        let outcome = UnlinkOutcome::from_rows_affected(result.rows_affected());
        tracing::debug!(
            "Unfollow: follower={}, following={}, outcome={:?}",
            follow.follower_id,
            follow.following_id,
            outcome
        );
        Ok(outcome)
    }

    async fn is_following(&self, follow: &UserFollow) -> ApiResult<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count
             FROM userFollow
             WHERE following_id = ? AND follower_id = ?",
        )
        .bind(follow.following_id)
        .bind(follow.follower_id)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }
}
