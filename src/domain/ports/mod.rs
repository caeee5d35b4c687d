pub mod article_repository;
pub mod tag_repository;
pub mod user_repository;

pub use article_repository::ArticleRepository;
pub use tag_repository::TagRepository;
pub use user_repository::UserRepository;
