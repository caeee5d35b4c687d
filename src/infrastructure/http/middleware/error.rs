use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::fmt;

pub const NOT_FOUND_MESSAGE: &str = "Record is not found";
pub const VALIDATION_MESSAGE: &str = "Validation failed";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body is too large";
pub const INTERNAL_MESSAGE: &str = "Something went wrong";

/// One step into the rejected input: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        let path = if field.is_empty() {
            Vec::new()
        } else {
            vec![field.into()]
        };
        Self::at(path, message)
    }

    pub fn at(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0:?}")]
    Validation(Vec<ValidationIssue>),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Payload too large")]
    PayloadTooLarge,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(what) => {
                tracing::debug!("Not found: {}", what);
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "message": NOT_FOUND_MESSAGE })),
                )
                    .into_response()
            }
            ApiError::Validation(issues) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "message": VALIDATION_MESSAGE,
                    "issues": issues,
                })),
            )
                .into_response(),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": UNAUTHORIZED_MESSAGE })),
            )
                .into_response(),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({ "message": METHOD_NOT_ALLOWED_MESSAGE })),
            )
                .into_response(),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({ "message": PAYLOAD_TOO_LARGE_MESSAGE })),
            )
                .into_response(),
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": INTERNAL_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}

// Unique violations are mapped by the repositories that know which column
// was hit; everything reaching this conversion is either a missing row or a
// failure the client cannot act on.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("row".to_string()),
            sqlx::Error::Database(db_err) => {
                ApiError::Internal(format!("Database error: {}", db_err.message()))
            }
            other => ApiError::Internal(format!("Database failure: {}", other)),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let response = ApiError::NotFound("article".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Record is not found" })
        );
    }

    #[tokio::test]
    async fn test_validation_carries_issues() {
        let response =
            ApiError::Validation(vec![ValidationIssue::new("title", "too short")]).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({
                "message": "Validation failed",
                "issues": [{ "path": ["title"], "message": "too short" }]
            })
        );
    }

    #[tokio::test]
    async fn test_business_error_keeps_message() {
        let response =
            ApiError::BadRequest("Username is already taken".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Username is already taken" })
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = ApiError::Internal("disk on fire".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Something went wrong" })
        );
    }

    #[tokio::test]
    async fn test_method_not_allowed_keeps_message_shape() {
        let response = ApiError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Method not allowed" })
        );
    }

    #[test]
    fn test_index_segments_serialize_as_numbers() {
        let issue = ValidationIssue::at(vec!["tags".into(), 1.into()], "too short");
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            json!({ "path": ["tags", 1], "message": "too short" })
        );
    }

    #[test]
    fn test_row_not_found_converts_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_pool_errors_convert_to_internal() {
        let err: ApiError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
