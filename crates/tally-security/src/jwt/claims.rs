//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::UserId;
use uuid::Uuid;

/// JWT claims carried by both access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,

    /// Username.
    pub username: String,

    /// User's email.
    pub email: String,

    /// Token type (access or refresh).
    pub token_type: TokenType,

    /// Issued at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,

    /// Not before timestamp.
    pub nbf: i64,

    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// JWT ID (unique identifier for this token).
    pub jti: String,
}

/// Identity and registered-claim values shared by a token pair.
#[derive(Debug, Clone)]
pub struct ClaimsSubject<'a> {
    pub user_id: UserId,
    pub username: &'a str,
    pub email: &'a str,
    pub issuer: &'a str,
    pub audience: &'a str,
}

impl Claims {
    /// Creates claims of the given type expiring at `expires_at`.
    #[must_use]
    pub fn new(subject: &ClaimsSubject<'_>, token_type: TokenType, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.user_id.to_string(),
            username: subject.username.to_string(),
            email: subject.email.to_string(),
            token_type,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            nbf: now.timestamp(),
            iss: subject.issuer.to_string(),
            aud: subject.audience.to_string(),
            jti: Uuid::now_v7().to_string(),
        }
    }

    /// Returns the user ID, if the subject is a valid UUID.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.sub).ok()
    }

    /// Returns the expiration time.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks if this is an access token.
    #[must_use]
    pub const fn is_access_token(&self) -> bool {
        matches!(self.token_type, TokenType::Access)
    }

    /// Checks if this is a refresh token.
    #[must_use]
    pub const fn is_refresh_token(&self) -> bool {
        matches!(self.token_type, TokenType::Refresh)
    }
}

/// Token type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Access token (short-lived, used for API requests).
    Access,
    /// Refresh token (used to obtain a new token pair).
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn subject(user_id: UserId) -> ClaimsSubject<'static> {
        ClaimsSubject {
            user_id,
            username: "jane",
            email: "jane@example.com",
            issuer: "tally",
            audience: "tally-api",
        }
    }

    #[test]
    fn test_access_token_claims() {
        let user_id = UserId::new();
        let claims = Claims::new(&subject(user_id), TokenType::Access, Utc::now() + Duration::minutes(5));

        assert!(claims.is_access_token());
        assert!(!claims.is_refresh_token());
        assert_eq!(claims.user_id(), Some(user_id));
        assert!(claims.expires_at() > Utc::now());
    }

    #[test]
    fn test_each_token_gets_unique_jti() {
        let user_id = UserId::new();
        let expires = Utc::now() + Duration::minutes(5);
        let a = Claims::new(&subject(user_id), TokenType::Refresh, expires);
        let b = Claims::new(&subject(user_id), TokenType::Refresh, expires);
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_token_type_serialization() {
        assert_eq!(serde_json::to_string(&TokenType::Refresh).unwrap(), "\"refresh\"");
        assert_eq!(TokenType::Access.to_string(), "access");
    }
}
