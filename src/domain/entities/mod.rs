pub mod article;
pub mod relation;
pub mod tag;
pub mod user;

pub use article::*;
pub use relation::*;
pub use tag::*;
pub use user::*;
