use crate::domain::entities::Tag;
use crate::infrastructure::http::middleware::error::ApiResult;
use async_trait::async_trait;

#[async_trait]
pub trait TagRepository: Send + Sync {
    /// All tags, alphabetically
    async fn list_tags(&self) -> ApiResult<Vec<Tag>>;

    /// Tags linked to an article, alphabetically
    async fn get_article_tags(&self, article_id: i64) -> ApiResult<Vec<Tag>>;

    /// Delete those of the given tags no article references. Returns how many went.
    async fn delete_unused_tags(&self, tag_ids: &[i64]) -> ApiResult<u64>;
}
