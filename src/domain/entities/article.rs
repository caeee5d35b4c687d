use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::ProfileResponse;
use crate::infrastructure::http::middleware::{Validate, ValidationErrors, ValidationIssue};

pub const SLUG_MIN_LEN: usize = 10;
pub const SLUG_MAX_LEN: usize = 200;
pub const TITLE_MIN_LEN: usize = 10;
pub const TITLE_MAX_LEN: usize = 200;
pub const BODY_MIN_LEN: usize = 100;
pub const BODY_MAX_LEN: usize = 100_000;
pub const TAG_NAME_MAX_LEN: usize = 255;

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 20;

/// Stored article row.
#[derive(Debug, Clone)]
pub struct Article {
    pub id: i64,
    pub user_id: i64,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub favorites_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub user_id: i64,
    pub slug: String,
    pub title: String,
    pub body: String,
}

/// Scalar fields of a partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Article joined with everything the response needs, from one viewer's
/// point of view.
#[derive(Debug, Clone)]
pub struct ArticleView {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub favorites_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub favorited: bool,
    pub author_username: String,
    pub author_following: bool,
}

/// Composable listing filters. All set filters must match.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub author: Option<String>,
    pub tag: Option<String>,
    /// Only articles whose author is followed by this user
    pub feed_of: Option<i64>,
    /// Only articles favorited by this user
    pub favorited_by: Option<i64>,
    pub limit: i64,
    pub offset: i64,
}

// ========== DTOs ==========

/// Body of `POST /articles`
#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub slug: String,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl Validate for CreateArticleRequest {
    fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut errors = ValidationErrors::default();
        errors.check_length("slug", &self.slug, SLUG_MIN_LEN, SLUG_MAX_LEN);
        errors.check_length("title", &self.title, TITLE_MIN_LEN, TITLE_MAX_LEN);
        errors.check_length("body", &self.body, BODY_MIN_LEN, BODY_MAX_LEN);
        validate_tag_names(&mut errors, &self.tags);
        errors.into_result()
    }
}

/// Body of `PATCH /articles/:slug`. Omitting `tags` keeps the tag set,
/// an empty list clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateArticleRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Validate for UpdateArticleRequest {
    fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut errors = ValidationErrors::default();
        if let Some(slug) = &self.slug {
            errors.check_length("slug", slug, SLUG_MIN_LEN, SLUG_MAX_LEN);
        }
        if let Some(title) = &self.title {
            errors.check_length("title", title, TITLE_MIN_LEN, TITLE_MAX_LEN);
        }
        if let Some(body) = &self.body {
            errors.check_length("body", body, BODY_MIN_LEN, BODY_MAX_LEN);
        }
        if let Some(tags) = &self.tags {
            validate_tag_names(&mut errors, tags);
        }
        errors.into_result()
    }
}

impl UpdateArticleRequest {
    pub fn split(self) -> (ArticleChanges, Option<Vec<String>>) {
        (
            ArticleChanges {
                slug: self.slug,
                title: self.title,
                body: self.body,
            },
            self.tags,
        )
    }
}

fn validate_tag_names(errors: &mut ValidationErrors, tags: &[String]) {
    for (index, name) in tags.iter().enumerate() {
        errors.check_length_at(vec!["tags".into(), index.into()], name, 1, TAG_NAME_MAX_LEN);
    }
}

/// Body of `POST /articles/:slug/favorite`
#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub favorite: bool,
}

impl Validate for FavoriteRequest {
    fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        Ok(())
    }
}

/// Query string of `GET /articles`
#[derive(Debug, Default, Deserialize)]
pub struct ListArticlesQuery {
    pub author: Option<String>,
    pub tag: Option<String>,
    pub feed: Option<String>,
    pub favorite: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Validate for ListArticlesQuery {
    fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut errors = ValidationErrors::default();
        if let Some(feed) = &self.feed {
            if feed != "true" {
                errors.add("feed", "Invalid literal value, expected \"true\"");
            }
        }
        if let Some(favorite) = &self.favorite {
            if favorite != "true" {
                errors.add("favorite", "Invalid literal value, expected \"true\"");
            }
        }
        if let Some(limit) = self.limit {
            errors.check_range("limit", limit, 1, MAX_PAGE_LIMIT);
        }
        if let Some(offset) = self.offset {
            errors.check_range("offset", offset, 0, i64::MAX);
        }
        errors.into_result()
    }
}

impl ListArticlesQuery {
    pub fn wants_feed(&self) -> bool {
        self.feed.is_some()
    }

    pub fn wants_favorites(&self) -> bool {
        self.favorite.is_some()
    }
}

/// Article as exposed over HTTP. Timestamps are milliseconds since the epoch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub slug: String,
    pub title: String,
    pub body: String,
    pub favorites_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub tags: Vec<String>,
    pub favorited: bool,
    pub author: ProfileResponse,
}

impl From<ArticleView> for ArticleResponse {
    fn from(view: ArticleView) -> Self {
        Self {
            slug: view.slug,
            title: view.title,
            body: view.body,
            favorites_count: view.favorites_count,
            created_at: view.created_at.timestamp_millis(),
            updated_at: view.updated_at.timestamp_millis(),
            tags: view.tags,
            favorited: view.favorited,
            author: ProfileResponse {
                username: view.author_username,
                following: view.author_following,
            },
        }
    }
}
