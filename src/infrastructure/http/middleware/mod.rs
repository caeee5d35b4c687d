pub mod auth;
pub mod error;
pub mod validation;

pub use auth::{AppState, CurrentUser, MaybeUser};
pub use error::{ApiError, ApiResult, PathSegment, ValidationIssue};
pub use validation::{Validate, ValidatedJson, ValidatedQuery, ValidationErrors};
