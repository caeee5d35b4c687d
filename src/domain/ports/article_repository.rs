use crate::domain::entities::{
    Article, ArticleChanges, ArticleFilter, ArticleView, LinkOutcome, NewArticle, UnlinkOutcome,
};
use crate::infrastructure::http::middleware::error::ApiResult;
use async_trait::async_trait;

/// Article persistence. Every mutating method runs in its own transaction.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert the article and connect-or-create each tag. Returns the stored
    /// article as its author sees it.
    async fn create_article(
        &self,
        article: &NewArticle,
        tags: &[String],
    ) -> ApiResult<ArticleView>;

    /// Apply scalar changes and reconcile tags for the article owned by
    /// `acting_user_id`. `tags == None` leaves the tag set untouched.
    /// Missing article is `NotFound`, someone else's is `Unauthorized`.
    async fn update_article(
        &self,
        slug: &str,
        acting_user_id: i64,
        changes: &ArticleChanges,
        tags: Option<&[String]>,
    ) -> ApiResult<ArticleView>;

    /// Delete the article owned by `acting_user_id` together with its tag and
    /// favorite links, then prune tags nobody uses anymore.
    async fn delete_article(&self, slug: &str, acting_user_id: i64) -> ApiResult<()>;

    async fn get_article_by_slug(&self, slug: &str) -> ApiResult<Option<Article>>;

    /// Mark the article as favorited by the user (idempotent)
    async fn add_favorite(&self, slug: &str, user_id: i64) -> ApiResult<LinkOutcome>;

    /// Remove the user's favorite mark (idempotent)
    async fn remove_favorite(&self, slug: &str, user_id: i64) -> ApiResult<UnlinkOutcome>;

    /// Newest-first page of articles matching the filter
    async fn list_articles(
        &self,
        filter: &ArticleFilter,
        viewer_id: Option<i64>,
    ) -> ApiResult<Vec<ArticleView>>;
}
