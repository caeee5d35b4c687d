use std::collections::HashMap;

use crate::domain::entities::{
    Article, ArticleChanges, ArticleFilter, ArticleView, LinkOutcome, NewArticle, UnlinkOutcome,
};
use crate::domain::ports::article_repository::ArticleRepository;
use crate::domain::services::{dedupe_tag_names, TagDiff};
use crate::infrastructure::http::middleware::error::{ApiError, ApiResult};
use crate::infrastructure::observability::metrics;
use crate::infrastructure::persistence::tags::{
    connect_tags, delete_unused_tags_in, tags_for_article, unlink_article_tags,
};
use crate::infrastructure::persistence::{
    now_timestamp, parse_timestamp, unique_violation_message, Database,
};
use async_trait::async_trait;
use sqlx::{any::AnyRow, Any, AnyConnection, QueryBuilder, Row};

const VIEW_COLUMNS: &str = "SELECT a.id, a.slug, a.title, a.body, a.favorites_count,
        a.created_at, a.updated_at, u.username AS author_username, ";

fn article_from_row(row: &AnyRow) -> ApiResult<Article> {
    Ok(Article {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        slug: row.try_get("slug")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        favorites_count: row.try_get("favorites_count")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn view_from_row(row: &AnyRow) -> ApiResult<ArticleView> {
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;
    // EXISTS yields an integer
    let favorited: i64 = row.try_get("favorited")?;
    let following: i64 = row.try_get("author_following")?;

    Ok(ArticleView {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        favorites_count: row.try_get("favorites_count")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
        tags: Vec::new(),
        favorited: favorited != 0,
        author_username: row.try_get("author_username")?,
        author_following: following != 0,
    })
}

fn map_slug_conflict(err: sqlx::Error) -> ApiError {
    match unique_violation_message(&err) {
        Some(message) if message.contains("slug") => {
            ApiError::BadRequest("Slug is already taken".to_string())
        }
        _ => err.into(),
    }
}

async fn article_owner(conn: &mut AnyConnection, slug: &str) -> ApiResult<Option<i64>> {
    let row = sqlx::query("SELECT user_id FROM article WHERE slug = ?")
        .bind(slug)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(|row| row.try_get::<i64, _>("user_id")).transpose()?)
}

/// Why a write scoped to `slug` and `acting_user_id` matched nothing:
/// the article is missing (404) or belongs to someone else (401).
async fn ownership_error(conn: &mut AnyConnection, slug: &str, acting_user_id: i64) -> ApiError {
    match article_owner(conn, slug).await {
        Ok(Some(owner_id)) => {
            tracing::warn!(
                "User {} attempted to modify article {} owned by {}",
                acting_user_id,
                slug,
                owner_id
            );
            ApiError::Unauthorized
        }
        Ok(None) => ApiError::NotFound(format!("Article {} not found", slug)),
        Err(err) => err,
    }
}

async fn article_id_by_slug(conn: &mut AnyConnection, slug: &str) -> ApiResult<i64> {
    let row = sqlx::query("SELECT id FROM article WHERE slug = ?")
        .bind(slug)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Article {} not found", slug)))?;

    Ok(row.try_get("id")?)
}

/// Listing query: one row per article with the viewer-dependent flags
/// computed in SQL. Tags are loaded separately.
fn build_view_query<'a>(
    filter: &'a ArticleFilter,
    viewer_id: Option<i64>,
    only_id: Option<i64>,
) -> QueryBuilder<'a, Any> {
    let mut builder = QueryBuilder::<Any>::new(VIEW_COLUMNS);

    match viewer_id {
        Some(viewer) => {
            builder.push(
                "EXISTS (SELECT 1 FROM articleFavorite f
                 WHERE f.article_id = a.id AND f.user_id = ",
            );
            builder.push_bind(viewer);
            builder.push(
                ") AS favorited,
                 EXISTS (SELECT 1 FROM userFollow uf
                 WHERE uf.following_id = a.user_id AND uf.follower_id = ",
            );
            builder.push_bind(viewer);
            builder.push(") AS author_following");
        }
        None => {
            builder.push("0 AS favorited, 0 AS author_following");
        }
    }

    builder.push(
        " FROM article a
         INNER JOIN \"user\" u ON u.id = a.user_id
         WHERE 1 = 1",
    );

    if let Some(id) = only_id {
        builder.push(" AND a.id = ");
        builder.push_bind(id);
    }

    if let Some(author) = &filter.author {
        builder.push(" AND u.username = ");
        builder.push_bind(author.as_str());
    }

    if let Some(tag) = &filter.tag {
        builder.push(
            " AND EXISTS (SELECT 1 FROM articleTag at
              INNER JOIN tag t ON t.id = at.tag_id
              WHERE at.article_id = a.id AND t.name = ",
        );
        builder.push_bind(tag.as_str());
        builder.push(")");
    }

    if let Some(follower) = filter.feed_of {
        builder.push(
            " AND EXISTS (SELECT 1 FROM userFollow fu
              WHERE fu.following_id = a.user_id AND fu.follower_id = ",
        );
        builder.push_bind(follower);
        builder.push(")");
    }

    if let Some(user) = filter.favorited_by {
        builder.push(
            " AND EXISTS (SELECT 1 FROM articleFavorite fa
              WHERE fa.article_id = a.id AND fa.user_id = ",
        );
        builder.push_bind(user);
        builder.push(")");
    }

    builder.push(" ORDER BY a.created_at DESC, a.id DESC LIMIT ");
    builder.push_bind(filter.limit);
    builder.push(" OFFSET ");
    builder.push_bind(filter.offset);

    builder
}

async fn fetch_views(
    conn: &mut AnyConnection,
    filter: &ArticleFilter,
    viewer_id: Option<i64>,
    only_id: Option<i64>,
) -> ApiResult<Vec<ArticleView>> {
    let rows = build_view_query(filter, viewer_id, only_id)
        .build()
        .fetch_all(&mut *conn)
        .await?;

    let mut views = rows
        .iter()
        .map(view_from_row)
        .collect::<ApiResult<Vec<_>>>()?;

    let ids: Vec<i64> = views.iter().map(|v| v.id).collect();
    let mut tags = tag_names_for(conn, &ids).await?;
    for view in &mut views {
        view.tags = tags.remove(&view.id).unwrap_or_default();
    }

    Ok(views)
}

/// One article as `viewer_id` sees it, read on the caller's connection so a
/// write transaction can return what it just stored.
async fn view_by_id(conn: &mut AnyConnection, id: i64, viewer_id: i64) -> ApiResult<ArticleView> {
    let filter = ArticleFilter {
        limit: 1,
        ..Default::default()
    };

    fetch_views(conn, &filter, Some(viewer_id), Some(id))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(format!("Article {} not found", id)))
}

/// Tag names per article, each list sorted by name.
async fn tag_names_for(
    conn: &mut AnyConnection,
    article_ids: &[i64],
) -> ApiResult<HashMap<i64, Vec<String>>> {
    let mut by_article: HashMap<i64, Vec<String>> = HashMap::new();
    if article_ids.is_empty() {
        return Ok(by_article);
    }

    let mut builder = QueryBuilder::<Any>::new(
        "SELECT at.article_id AS article_id, t.name AS name
         FROM articleTag at
         INNER JOIN tag t ON t.id = at.tag_id
         WHERE at.article_id IN (",
    );
    let mut ids = builder.separated(", ");
    for id in article_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(")");
    builder.push(" ORDER BY t.name");

    let rows = builder.build().fetch_all(&mut *conn).await?;
    for row in rows {
        let article_id: i64 = row.try_get("article_id")?;
        let name: String = row.try_get("name")?;
        by_article.entry(article_id).or_default().push(name);
    }

    Ok(by_article)
}

// Every transaction below opens with a write, so it holds the write lock
// before it reads. In WAL mode a read-first transaction fails with
// SQLITE_BUSY_SNAPSHOT when another writer commits in between.
#[async_trait]
impl ArticleRepository for Database {
    async fn create_article(
        &self,
        article: &NewArticle,
        tags: &[String],
    ) -> ApiResult<ArticleView> {
        let now = now_timestamp();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "INSERT INTO article (user_id, slug, title, body, favorites_count, created_at, updated_at)
             VALUES (?, ?, ?, ?, 0, ?, ?)
             RETURNING id",
        )
        .bind(article.user_id)
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.body)
        .bind(&now)
        .bind(&now)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_slug_conflict)?;

        let article_id: i64 = row.try_get("id")?;
        connect_tags(&mut tx, article_id, &dedupe_tag_names(tags), &now).await?;
        let view = view_by_id(&mut tx, article_id, article.user_id).await?;

        tx.commit().await?;

        tracing::info!(
            "Article created: id={}, slug={}, author={}",
            article_id,
            article.slug,
            article.user_id
        );
        Ok(view)
    }

    async fn update_article(
        &self,
        slug: &str,
        acting_user_id: i64,
        changes: &ArticleChanges,
        tags: Option<&[String]>,
    ) -> ApiResult<ArticleView> {
        let now = now_timestamp();
        let mut tx = self.pool.begin().await?;

        let mut builder = QueryBuilder::<Any>::new("UPDATE article SET updated_at = ");
        builder.push_bind(now.as_str());
        if let Some(new_slug) = &changes.slug {
            builder.push(", slug = ");
            builder.push_bind(new_slug.as_str());
        }
        if let Some(title) = &changes.title {
            builder.push(", title = ");
            builder.push_bind(title.as_str());
        }
        if let Some(body) = &changes.body {
            builder.push(", body = ");
            builder.push_bind(body.as_str());
        }
        builder.push(" WHERE slug = ");
        builder.push_bind(slug);
        builder.push(" AND user_id = ");
        builder.push_bind(acting_user_id);
        builder.push(" RETURNING id");

        let updated = builder
            .build()
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_slug_conflict)?;

        let article_id: i64 = match updated {
            Some(row) => row.try_get("id")?,
            None => return Err(ownership_error(&mut tx, slug, acting_user_id).await),
        };

        let current = tags_for_article(&mut tx, article_id).await?;
        let diff = TagDiff::compute(&current, tags);
        if !diff.is_empty() {
            connect_tags(&mut tx, article_id, &diff.add_names, &now).await?;
            unlink_article_tags(&mut tx, article_id, &diff.remove_ids).await?;
            let pruned = delete_unused_tags_in(&mut tx, &diff.remove_ids).await?;
            metrics::tags_pruned(pruned);
        }

        let view = view_by_id(&mut tx, article_id, acting_user_id).await?;
        tx.commit().await?;

        tracing::info!(
            "Article updated: id={}, added_tags={}, removed_tags={}",
            article_id,
            diff.add_names.len(),
            diff.remove_ids.len()
        );
        Ok(view)
    }

    async fn delete_article(&self, slug: &str, acting_user_id: i64) -> ApiResult<()> {
        let mut tx = self.pool.begin().await?;

        let tag_ids: Vec<i64> = sqlx::query(
            "DELETE FROM articleTag
             WHERE article_id IN (SELECT id FROM article WHERE slug = ? AND user_id = ?)
             RETURNING tag_id",
        )
        .bind(slug)
        .bind(acting_user_id)
        .fetch_all(&mut *tx)
        .await?
        .iter()
        .map(|row| row.try_get("tag_id"))
        .collect::<Result<_, _>>()?;

        sqlx::query(
            "DELETE FROM articleFavorite
             WHERE article_id IN (SELECT id FROM article WHERE slug = ? AND user_id = ?)",
        )
        .bind(slug)
        .bind(acting_user_id)
        .execute(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM article WHERE slug = ? AND user_id = ? RETURNING id")
            .bind(slug)
            .bind(acting_user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let article_id: i64 = match deleted {
            Some(row) => row.try_get("id")?,
            None => return Err(ownership_error(&mut tx, slug, acting_user_id).await),
        };

        let pruned = delete_unused_tags_in(&mut tx, &tag_ids).await?;

        tx.commit().await?;

        metrics::tags_pruned(pruned);
        tracing::info!("Article deleted: id={}, slug={}", article_id, slug);
        Ok(())
    }

    async fn get_article_by_slug(&self, slug: &str) -> ApiResult<Option<Article>> {
        let row = sqlx::query(
            "SELECT id, user_id, slug, title, body, favorites_count, created_at, updated_at
             FROM article
             WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(article_from_row).transpose()
    }

    async fn add_favorite(&self, slug: &str, user_id: i64) -> ApiResult<LinkOutcome> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO articleFavorite (user_id, article_id)
             SELECT ?, id FROM article WHERE slug = ?
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(slug)
        .execute(&mut *tx)
        .await?;

        // Nothing inserted means either a missing article or an existing mark
        let article_id = article_id_by_slug(&mut tx, slug).await?;

        let outcome = LinkOutcome::from_rows_affected(result.rows_affected());
        if outcome == LinkOutcome::Created {
            sqlx::query("UPDATE article SET favorites_count = favorites_count + 1 WHERE id = ?")
                .bind(article_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Favorite: user={}, article={}, outcome={:?}",
            user_id,
            article_id,
            outcome
        );
        Ok(outcome)
    }

    async fn remove_favorite(&self, slug: &str, user_id: i64) -> ApiResult<UnlinkOutcome> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "DELETE FROM articleFavorite
             WHERE user_id = ? AND article_id IN (SELECT id FROM article WHERE slug = ?)",
        )
        .bind(user_id)
        .bind(slug)
        .execute(&mut *tx)
        .await?;

        let article_id = article_id_by_slug(&mut tx, slug).await?;

        let outcome = UnlinkOutcome::from_rows_affected(result.rows_affected());
        if outcome == UnlinkOutcome::Removed {
            sqlx::query(
                "UPDATE article SET favorites_count = MAX(favorites_count - 1, 0) WHERE id = ?",
            )
            .bind(article_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Unfavorite: user={}, article={}, outcome={:?}",
            user_id,
            article_id,
            outcome
        );
        Ok(outcome)
    }

    async fn list_articles(
        &self,
        filter: &ArticleFilter,
        viewer_id: Option<i64>,
    ) -> ApiResult<Vec<ArticleView>> {
        let mut conn = self.pool.acquire().await?;
        fetch_views(&mut conn, filter, viewer_id, None).await
    }
}
