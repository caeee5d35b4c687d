use crate::domain::entities::{ArticleTag, LinkOutcome, Tag};
use crate::domain::ports::tag_repository::TagRepository;
use crate::infrastructure::http::middleware::error::ApiResult;
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use sqlx::{any::AnyRow, Any, AnyConnection, QueryBuilder, Row};

fn tag_from_row(row: &AnyRow) -> ApiResult<Tag> {
    Ok(Tag {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

// Connection-level helpers so article writes can run them inside their
// own transaction.

/// Id of the tag called `name`, inserting it first when missing.
pub(crate) async fn find_or_create_tag(
    conn: &mut AnyConnection,
    name: &str,
    now: &str,
) -> ApiResult<i64> {
    sqlx::query(
        "INSERT INTO tag (name, created_at, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(name) DO NOTHING",
    )
    .bind(name)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let row = sqlx::query("SELECT id FROM tag WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    Ok(row.try_get("id")?)
}

pub(crate) async fn link_article_tag(
    conn: &mut AnyConnection,
    link: &ArticleTag,
) -> ApiResult<LinkOutcome> {
    let result = sqlx::query(
        "INSERT INTO articleTag (tag_id, article_id)
         VALUES (?, ?)
         ON CONFLICT DO NOTHING",
    )
    .bind(link.tag_id)
    .bind(link.article_id)
    .execute(&mut *conn)
    .await?;

    Ok(LinkOutcome::from_rows_affected(result.rows_affected()))
}

/// Connect-or-create every name. Names must already be de-duplicated.
pub(crate) async fn connect_tags(
    conn: &mut AnyConnection,
    article_id: i64,
    names: &[String],
    now: &str,
) -> ApiResult<()> {
    for name in names {
        let tag_id = find_or_create_tag(conn, name, now).await?;
        link_article_tag(conn, &ArticleTag { tag_id, article_id }).await?;
    }
    Ok(())
}

pub(crate) async fn unlink_article_tags(
    conn: &mut AnyConnection,
    article_id: i64,
    tag_ids: &[i64],
) -> ApiResult<u64> {
    if tag_ids.is_empty() {
        return Ok(0);
    }

    let mut builder = QueryBuilder::<Any>::new("DELETE FROM articleTag WHERE article_id = ");
    builder.push_bind(article_id);
    builder.push(" AND tag_id IN (");
    let mut ids = builder.separated(", ");
    for id in tag_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(")");

    let result = builder.build().execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

pub(crate) async fn tags_for_article(
    conn: &mut AnyConnection,
    article_id: i64,
) -> ApiResult<Vec<Tag>> {
    let rows = sqlx::query(
        "SELECT t.id, t.name, t.created_at, t.updated_at
         FROM tag t
         INNER JOIN articleTag at ON at.tag_id = t.id
         WHERE at.article_id = ?
         ORDER BY t.name",
    )
    .bind(article_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(tag_from_row).collect()
}

/// Delete those of `tag_ids` no article links to anymore.
pub(crate) async fn delete_unused_tags_in(
    conn: &mut AnyConnection,
    tag_ids: &[i64],
) -> ApiResult<u64> {
    if tag_ids.is_empty() {
        return Ok(0);
    }

    let mut builder = QueryBuilder::<Any>::new("DELETE FROM tag WHERE id IN (");
    let mut ids = builder.separated(", ");
    for id in tag_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(")");
    builder.push(" AND NOT EXISTS (SELECT 1 FROM articleTag at WHERE at.tag_id = tag.id)");

    let result = builder.build().execute(&mut *conn).await?;
    let deleted = result.rows_affected();
    if deleted > 0 {
        tracing::info!("Pruned {} unused tag(s)", deleted);
    }
    Ok(deleted)
}

#[async_trait]
impl TagRepository for Database {
    async fn list_tags(&self) -> ApiResult<Vec<Tag>> {
        let rows = sqlx::query(
            "SELECT id, name, created_at, updated_at
             FROM tag
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(tag_from_row).collect()
    }

    async fn get_article_tags(&self, article_id: i64) -> ApiResult<Vec<Tag>> {
        let mut conn = self.pool.acquire().await?;
        tags_for_article(&mut conn, article_id).await
    }

    async fn delete_unused_tags(&self, tag_ids: &[i64]) -> ApiResult<u64> {
        let mut conn = self.pool.acquire().await?;
        delete_unused_tags_in(&mut conn, tag_ids).await
    }
}
