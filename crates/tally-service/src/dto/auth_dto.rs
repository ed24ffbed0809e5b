//! Authentication-related DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::validation::rules::{password_strength, valid_username};
use tally_core::UserId;
use utoipa::ToSchema;
use validator::Validate;

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(custom(function = "valid_username", message = "Username must be 3-32 letters, digits, '.', '_' or '-'"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "password_strength", message = "Password must contain letters and digits")
    )]
    pub password: String,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub username_or_email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Authentication response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Public view of a user account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(register("jane_doe", "jane@example.com", "secret123").validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_username() {
        assert!(register("ab", "jane@example.com", "secret123").validate().is_err());
        assert!(register("jane doe", "jane@example.com", "secret123").validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        assert!(register("jane", "not-an-email", "secret123").validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_weak_password() {
        assert!(register("jane", "jane@example.com", "short1").validate().is_err());
        assert!(register("jane", "jane@example.com", "lettersonly").validate().is_err());
    }

    #[test]
    fn test_login_request_requires_fields() {
        let request = LoginRequest {
            username_or_email: String::new(),
            password: String::new(),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }
}
