/// Stored tag row. Tags exist only while at least one article uses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Join row linking an article to a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleTag {
    pub tag_id: i64,
    pub article_id: i64,
}
