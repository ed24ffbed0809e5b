//! Validated JSON extractor for automatic request validation.
//!
//! `ValidatedJson<T>` deserializes the body and validates it with the
//! `validator` crate. Both malformed JSON and constraint violations are
//! answered with 400 Bad Request; violations carry field-level details.

use crate::responses::error_response;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use tally_core::{field_errors, ErrorResponse, FieldError};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// JSON extractor that automatically validates the deserialized value.
///
/// # Example
///
/// ```ignore
/// use tally_rest::extractors::ValidatedJson;
///
/// async fn create(ValidatedJson(request): ValidatedJson<CreateCategoryRequest>) {
///     // request is guaranteed to be valid here
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// JSON parsing/deserialization error.
    JsonError(JsonRejection),
    /// Validation error with field-level details.
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let error = match self {
            Self::JsonError(rejection) => ErrorResponse {
                code: "INVALID_JSON".to_string(),
                message: rejection.body_text(),
                details: None,
            },
            Self::ValidationError(errors) => ErrorResponse {
                code: "VALIDATION_ERROR".to_string(),
                message: "Request validation failed".to_string(),
                details: None,
            }
            .with_details(convert_validation_errors(&errors)),
        };
        error_response(StatusCode::BAD_REQUEST, error)
    }
}

/// Flattens validator errors, including nested structs and lists.
fn convert_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields = field_errors(errors);

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Struct(nested) => {
                fields.extend(convert_validation_errors(nested).into_iter().map(|e| FieldError {
                    field: format!("{field}.{}", e.field),
                    ..e
                }));
            }
            ValidationErrorsKind::List(items) => {
                for (index, item) in items {
                    fields.extend(convert_validation_errors(item).into_iter().map(|e| FieldError {
                        field: format!("{field}[{index}].{}", e.field),
                        ..e
                    }));
                }
            }
            ValidationErrorsKind::Field(_) => {}
        }
    }

    fields
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value.validate().map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct LimitRequest {
        #[validate(length(min = 1, max = 30, message = "Name must be between 1 and 30 characters"))]
        name: String,
        #[validate(range(min = 0, message = "Count must not be negative"))]
        count: i64,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Wrapper {
        #[validate(nested)]
        inner: LimitRequest,
    }

    #[test]
    fn test_convert_single_field() {
        let errors = LimitRequest {
            name: String::new(),
            count: 1,
        }
        .validate()
        .unwrap_err();

        let fields = convert_validation_errors(&errors);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "name");
        assert_eq!(fields[0].message, "Name must be between 1 and 30 characters");
    }

    #[test]
    fn test_convert_multiple_fields() {
        let errors = LimitRequest {
            name: "x".repeat(31),
            count: -1,
        }
        .validate()
        .unwrap_err();

        let names: Vec<String> = convert_validation_errors(&errors).into_iter().map(|e| e.field).collect();
        assert_eq!(names, vec!["count", "name"]);
    }

    #[test]
    fn test_convert_nested() {
        let errors = Wrapper {
            inner: LimitRequest {
                name: String::new(),
                count: 0,
            },
        }
        .validate()
        .unwrap_err();

        let fields = convert_validation_errors(&errors);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "inner.name");
    }

    #[test]
    fn test_rejection_is_bad_request() {
        let errors = LimitRequest {
            name: String::new(),
            count: 0,
        }
        .validate()
        .unwrap_err();

        let response = ValidatedJsonRejection::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
