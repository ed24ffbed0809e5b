//! Authenticated user extractor.

use crate::responses::error_response;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use tally_core::{ErrorResponse, TallyError, UserId};
use tally_security::Claims;

/// Extractor for the authenticated user.
///
/// The auth middleware validates the bearer token and stores the claims in
/// the request extensions; this extractor turns their absence into a 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub claims: Claims,
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.claims
    }
}

/// Error type for authentication extraction.
#[derive(Debug)]
pub struct AuthError(pub TallyError);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::UNAUTHORIZED);
        error_response(status, ErrorResponse::from_error(&self.0))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AuthError(TallyError::unauthorized("Missing authorization header")))?;

        if !auth_header.starts_with("Bearer ") {
            return Err(AuthError(TallyError::unauthorized("Invalid authorization format")));
        }

        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AuthError(TallyError::unauthorized("Invalid or expired token")))?;

        let user_id = claims
            .user_id()
            .ok_or_else(|| AuthError(TallyError::InvalidToken("Token subject is not a user id".to_string())))?;

        Ok(Self { user_id, claims })
    }
}
