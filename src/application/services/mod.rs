pub mod article_service;
pub mod auth_service;
pub mod tag_service;
pub mod user_service;

pub use article_service::ArticleService;
pub use auth_service::{hash_password, verify_password, TokenService};
pub use tag_service::TagService;
pub use user_service::UserService;
