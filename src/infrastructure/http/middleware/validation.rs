use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

use super::error::{ApiError, PathSegment, ValidationIssue};

/// Shape checks run on a request payload after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<ValidationIssue>>;
}

/// Collects every issue of one payload so they are reported together.
#[derive(Debug, Default)]
pub struct ValidationErrors(Vec<ValidationIssue>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(ValidationIssue::new(field, message));
    }

    /// Character-length bounds, inclusive on both ends.
    pub fn check_length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        self.check_length_at(vec![field.into()], value, min, max);
    }

    /// Same as `check_length` for a value nested below the top level,
    /// e.g. one element of an array field.
    pub fn check_length_at(&mut self, path: Vec<PathSegment>, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min {
            self.0.push(ValidationIssue::at(
                path,
                format!("must contain at least {} character(s)", min),
            ));
        } else if len > max {
            self.0.push(ValidationIssue::at(
                path,
                format!("must contain at most {} character(s)", max),
            ));
        }
    }

    pub fn check_range(&mut self, field: &str, value: i64, min: i64, max: i64) {
        if value < min {
            self.add(field, format!("must be greater than or equal to {}", min));
        } else if value > max {
            self.add(field, format!("must be less than or equal to {}", max));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), Vec<ValidationIssue>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

/// JSON body that has been deserialized and validated.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge,
                _ => ApiError::Validation(vec![ValidationIssue::new("", rejection.body_text())]),
            })?;

        value.validate().map_err(ApiError::Validation)?;
        Ok(Self(value))
    }
}

/// Query string that has been deserialized and validated.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(vec![ValidationIssue::new("", rejection.body_text())])
            })?;

        value.validate().map_err(ApiError::Validation)?;
        Ok(Self(value))
    }
}
