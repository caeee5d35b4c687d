use crate::{
    domain::entities::*,
    domain::ports::article_repository::ArticleRepository,
    infrastructure::http::middleware::error::{ApiError, ApiResult},
    infrastructure::observability::metrics,
};
use std::sync::Arc;

/// Publishing, editing, listing and favoriting articles
#[derive(Clone)]
pub struct ArticleService {
    article_repo: Arc<dyn ArticleRepository>,
}

impl ArticleService {
    pub fn new(article_repo: Arc<dyn ArticleRepository>) -> Self {
        Self { article_repo }
    }

    /// Newest-first page. `feed` and `favorite` are relative to the viewer,
    /// so they need one.
    pub async fn list(
        &self,
        query: ListArticlesQuery,
        viewer_id: Option<i64>,
    ) -> ApiResult<Vec<ArticleResponse>> {
        let needs_viewer = query.wants_feed() || query.wants_favorites();
        if needs_viewer && viewer_id.is_none() {
            return Err(ApiError::Unauthorized);
        }

        let filter = ArticleFilter {
            feed_of: viewer_id.filter(|_| query.wants_feed()),
            favorited_by: viewer_id.filter(|_| query.wants_favorites()),
            author: query.author,
            tag: query.tag,
            limit: query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            offset: query.offset.unwrap_or(0),
        };

        let views = self.article_repo.list_articles(&filter, viewer_id).await?;
        Ok(views.into_iter().map(ArticleResponse::from).collect())
    }

    pub async fn create(
        &self,
        author_id: i64,
        request: CreateArticleRequest,
    ) -> ApiResult<ArticleResponse> {
        let new_article = NewArticle {
            user_id: author_id,
            slug: request.slug,
            title: request.title,
            body: request.body,
        };

        let view = self
            .article_repo
            .create_article(&new_article, &request.tags)
            .await?;
        metrics::article_created();

        Ok(view.into())
    }

    pub async fn update(
        &self,
        acting_user_id: i64,
        slug: &str,
        request: UpdateArticleRequest,
    ) -> ApiResult<ArticleResponse> {
        let (changes, tags) = request.split();

        let view = self
            .article_repo
            .update_article(slug, acting_user_id, &changes, tags.as_deref())
            .await?;

        Ok(view.into())
    }

    pub async fn delete(&self, acting_user_id: i64, slug: &str) -> ApiResult<()> {
        self.article_repo.delete_article(slug, acting_user_id).await?;
        metrics::article_deleted();
        Ok(())
    }

    /// Set or clear the viewer's favorite mark. Both directions are idempotent.
    pub async fn set_favorite(&self, user_id: i64, slug: &str, favorite: bool) -> ApiResult<()> {
        if favorite {
            self.article_repo.add_favorite(slug, user_id).await?;
        } else {
            self.article_repo.remove_favorite(slug, user_id).await?;
        }
        Ok(())
    }
}
