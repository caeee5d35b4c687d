use crate::{
    domain::ports::tag_repository::TagRepository,
    infrastructure::http::middleware::error::ApiResult,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct TagService {
    tag_repo: Arc<dyn TagRepository>,
}

impl TagService {
    pub fn new(tag_repo: Arc<dyn TagRepository>) -> Self {
        Self { tag_repo }
    }

    /// Names of every tag in use, alphabetically
    pub async fn list_names(&self) -> ApiResult<Vec<String>> {
        let tags = self.tag_repo.list_tags().await?;
        Ok(tags.into_iter().map(|tag| tag.name).collect())
    }
}
