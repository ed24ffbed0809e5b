//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Tally.
///
/// Every layer returns this type so that the REST layer can map any failure
/// to an HTTP status and a machine-readable code in one place.
#[derive(Error, Debug)]
pub enum TallyError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("{resource_type} with the {key} \"{value}\" not found")]
    NotFound {
        resource_type: &'static str,
        key: &'static str,
        value: String,
    },

    /// Validation error
    #[error("{0}")]
    Validation(String),

    /// Conflict error (e.g., duplicate entry)
    #[error("{0}")]
    Conflict(String),

    /// Business rule violation
    #[error("{0}")]
    BusinessRule(String),

    // ============ Authentication Errors ============
    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid token
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token expired
    #[error("Token expired")]
    TokenExpired,

    /// Invalid credentials
    #[error("Invalid credentials")]
    InvalidCredentials,

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TallyError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) | Self::BusinessRule(_) => 400,
            Self::Conflict(_) => 409,
            Self::Unauthorized(_) | Self::InvalidToken(_) | Self::TokenExpired | Self::InvalidCredentials => 401,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource looked up by id.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::not_found_by(resource_type, "id", id)
    }

    /// Creates a not found error for a resource looked up by another key.
    #[must_use]
    pub fn not_found_by<T: ToString>(resource_type: &'static str, key: &'static str, value: T) -> Self {
        Self::NotFound {
            resource_type,
            key,
            value: value.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a business rule violation.
    #[must_use]
    pub fn business_rule<T: Into<String>>(message: T) -> Self {
        Self::BusinessRule(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true for errors caused by the client rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for TallyError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "Row",
                key: "id",
                value: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    return Self::Conflict(db_err.message().to_string());
                }
                if db_err.is_foreign_key_violation() {
                    return Self::Validation(db_err.message().to_string());
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {err}"))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `TallyError`.
    ///
    /// Server-side failures never leak their internal message.
    #[must_use]
    pub fn from_error(error: &TallyError) -> Self {
        let message = if error.is_client_error() {
            error.to_string()
        } else {
            "An internal error occurred".to_string()
        };
        Self {
            code: error.error_code().to_string(),
            message,
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&TallyError> for ErrorResponse {
    fn from(error: &TallyError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(TallyError::not_found("Expense", 1).status_code(), 404);
        assert_eq!(TallyError::validation("Amount must be greater than 0").status_code(), 400);
        assert_eq!(TallyError::business_rule("Limit has been reached").status_code(), 400);
        assert_eq!(TallyError::unauthorized("not logged in").status_code(), 401);
        assert_eq!(TallyError::conflict("duplicate").status_code(), 409);
        assert_eq!(TallyError::TokenExpired.status_code(), 401);
        assert_eq!(TallyError::InvalidCredentials.status_code(), 401);
        assert_eq!(TallyError::Database("db error".to_string()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(TallyError::not_found("Expense", 1).error_code(), "NOT_FOUND");
        assert_eq!(TallyError::validation("bad input").error_code(), "VALIDATION_ERROR");
        assert_eq!(TallyError::business_rule("limit").error_code(), "BUSINESS_RULE_VIOLATION");
        assert_eq!(TallyError::TokenExpired.error_code(), "TOKEN_EXPIRED");
        assert_eq!(TallyError::internal("err").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_not_found_by_slug_message() {
        let err = TallyError::not_found_by("Category", "slug", "groceries");
        assert_eq!(err.to_string(), "Category with the slug \"groceries\" not found");
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = TallyError::validation("Amount must be greater than 0");
        assert_eq!(err.to_string(), "Amount must be greater than 0");
    }

    #[test]
    fn test_error_response_hides_internal_details() {
        let err = TallyError::Database("no such table: expenses".to_string());
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "DATABASE_ERROR");
        assert!(!response.message.contains("expenses"));
    }

    #[test]
    fn test_error_response_with_details() {
        let err = TallyError::validation("bad input");
        let details = vec![FieldError {
            field: "name".to_string(),
            message: "Name must be between 1 and 30 characters".to_string(),
            code: "length".to_string(),
        }];
        let response = ErrorResponse::from_error(&err).with_details(details);
        assert_eq!(response.details.map(|d| d.len()), Some(1));
    }
}
