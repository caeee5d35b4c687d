use serde::{Deserialize, Serialize};

use crate::infrastructure::http::middleware::{Validate, ValidationErrors, ValidationIssue};
use crate::shared::utils::is_valid_email;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 1024;

/// Stored user row. `password_hash` never leaves the service layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Directed edge: `follower_id` follows `following_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFollow {
    pub following_id: i64,
    pub follower_id: i64,
}

// ========== DTOs ==========

/// Body of `POST /users`
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterUserRequest {
    fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut errors = ValidationErrors::default();
        errors.check_length("username", &self.username, USERNAME_MIN_LEN, USERNAME_MAX_LEN);
        if !is_valid_email(&self.email) {
            errors.add("email", "Invalid email");
        }
        errors.check_length("password", &self.password, PASSWORD_MIN_LEN, PASSWORD_MAX_LEN);
        errors.into_result()
    }
}

/// Body of `POST /users/auth`
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut errors = ValidationErrors::default();
        if !is_valid_email(&self.email) {
            errors.add("email", "Invalid email");
        }
        errors.check_length("password", &self.password, PASSWORD_MIN_LEN, PASSWORD_MAX_LEN);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Response of register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    pub token: String,
}

/// Author block embedded in article responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileResponse {
    pub username: String,
    pub following: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::middleware::PathSegment;

    fn register(username: &str, email: &str, password: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(register("alice", "alice@example.com", "password1")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_registration_reports_every_issue() {
        let issues = register("al", "not-an-email", "short")
            .validate()
            .unwrap_err();
        let fields: Vec<String> = issues.iter().map(|i| i.path[0].to_string()).collect();
        assert_eq!(fields, vec!["username", "email", "password"]);
    }

    #[test]
    fn test_username_too_long() {
        let issues = register(&"a".repeat(31), "alice@example.com", "password1")
            .validate()
            .unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, vec![PathSegment::from("username")]);
    }

    #[test]
    fn test_login_requires_password() {
        let request = LoginRequest {
            email: "alice@example.com".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_password_shorter_than_registration_minimum_is_rejected() {
        let request = LoginRequest {
            email: "alice@example.com".to_string(),
            password: "a".repeat(PASSWORD_MIN_LEN - 1),
        };
        let issues = request.validate().unwrap_err();
        assert_eq!(issues[0].path, vec![PathSegment::from("password")]);
    }
}
