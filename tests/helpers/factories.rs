use conduit::application::services::TokenService;
use conduit::domain::entities::{NewArticle, NewUser, User, BODY_MIN_LEN};
use conduit::domain::ports::article_repository::ArticleRepository;
use conduit::domain::ports::user_repository::UserRepository;
use conduit::infrastructure::persistence::Database;
use sqlx::Row;

/// User with a placeholder hash. Register over HTTP when the password matters.
pub async fn create_test_user(db: &Database, username: &str) -> User {
    db.create_user(&NewUser {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password_hash: "not-a-real-hash".to_string(),
    })
    .await
    .expect("Failed to create test user")
}

pub fn token_for(tokens: &TokenService, user: &User) -> String {
    tokens.issue(user.id).expect("Failed to issue token")
}

pub fn article_body() -> String {
    "Lorem ipsum dolor sit amet. ".repeat(BODY_MIN_LEN / 10)
}

/// Article with a slug and title derived from `key`. Returns the slug.
pub async fn create_test_article(db: &Database, author: &User, key: &str, tags: &[&str]) -> String {
    let slug = format!("article-{}", key);
    let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();

    db.create_article(
        &NewArticle {
            user_id: author.id,
            slug: slug.clone(),
            title: format!("Article title {}", key),
            body: article_body(),
        },
        &tags,
    )
    .await
    .expect("Failed to create test article");

    slug
}

/// Every tag name in the table, sorted.
pub async fn all_tag_names(db: &Database) -> Vec<String> {
    sqlx::query("SELECT name FROM tag ORDER BY name")
        .fetch_all(db.pool())
        .await
        .expect("Failed to list tags")
        .iter()
        .map(|row| row.try_get::<String, _>("name").expect("name column"))
        .collect()
}

pub async fn count_rows(db: &Database, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) AS count FROM {}", table);
    let row = sqlx::query(&sql)
        .fetch_one(db.pool())
        .await
        .expect("Failed to count rows");
    row.try_get("count").expect("count column")
}
