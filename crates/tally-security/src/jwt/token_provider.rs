//! JWT token provider for creating and validating tokens.

use super::{Claims, ClaimsSubject, TokenType};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use shaku::Component;
use std::sync::Arc;
use tally_config::SecurityConfig;
use tally_core::{Interface, TallyError, TallyResult, UserId};
use tracing::{debug, warn};

/// Token pair containing access and refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
    /// Token type (always "Bearer").
    pub token_type: String,
}

/// Identity encoded into issued tokens.
#[derive(Debug, Clone, Copy)]
pub struct TokenIdentity<'a> {
    pub user_id: UserId,
    pub username: &'a str,
    pub email: &'a str,
}

/// Interface for issuing and validating JWTs.
pub trait TokenProviderInterface: Interface {
    /// Issues an access/refresh token pair.
    fn generate_tokens(&self, identity: TokenIdentity<'_>) -> TallyResult<TokenPair>;

    /// Validates an access token and returns its claims.
    fn validate_access_token(&self, token: &str) -> TallyResult<Claims>;

    /// Validates a refresh token and returns its claims.
    fn validate_refresh_token(&self, token: &str) -> TallyResult<Claims>;
}

/// HS256 JWT token provider.
#[derive(Component, Clone)]
#[shaku(interface = TokenProviderInterface)]
pub struct TokenProvider {
    config: Arc<SecurityConfig>,
}

impl TokenProvider {
    /// Creates a new token provider.
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        Self { config }
    }

    /// Returns the security configuration for component parameters.
    #[must_use]
    pub fn config(&self) -> Arc<SecurityConfig> {
        Arc::clone(&self.config)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.jwt_issuer]);
        validation.set_audience(&[&self.config.jwt_audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;
        validation
    }

    fn encode_claims(&self, claims: &Claims) -> TallyResult<String> {
        let key = EncodingKey::from_secret(self.config.jwt_secret.as_bytes());
        encode(&Header::default(), claims, &key)
            .map_err(|e| TallyError::Internal(format!("Failed to generate {} token: {e}", claims.token_type)))
    }

    fn lifetime(secs: u64) -> Duration {
        Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1000))
    }

    /// Validates a token of any type and returns the claims.
    pub fn validate_token(&self, token: &str) -> TallyResult<Claims> {
        let key = DecodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let token_data = decode::<Claims>(token, &key, &self.validation()).map_err(|e| {
            warn!("Token validation failed: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => TallyError::TokenExpired,
                ErrorKind::InvalidToken | ErrorKind::InvalidSignature => {
                    TallyError::InvalidToken("Invalid token signature".to_string())
                }
                ErrorKind::InvalidIssuer => TallyError::InvalidToken("Invalid token issuer".to_string()),
                ErrorKind::InvalidAudience => TallyError::InvalidToken("Invalid token audience".to_string()),
                _ => TallyError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    fn expect_type(claims: Claims, expected: TokenType) -> TallyResult<Claims> {
        if claims.token_type != expected {
            return Err(TallyError::InvalidToken(format!("Expected {expected} token")));
        }
        Ok(claims)
    }
}

impl TokenProviderInterface for TokenProvider {
    fn generate_tokens(&self, identity: TokenIdentity<'_>) -> TallyResult<TokenPair> {
        let subject = ClaimsSubject {
            user_id: identity.user_id,
            username: identity.username,
            email: identity.email,
            issuer: &self.config.jwt_issuer,
            audience: &self.config.jwt_audience,
        };

        let now = Utc::now();
        let access_expires_at = now + Self::lifetime(self.config.jwt_access_expiration_secs);
        let refresh_expires_at = now + Self::lifetime(self.config.jwt_refresh_expiration_secs);

        let access_token = self.encode_claims(&Claims::new(&subject, TokenType::Access, access_expires_at))?;
        let refresh_token = self.encode_claims(&Claims::new(&subject, TokenType::Refresh, refresh_expires_at))?;

        debug!("Generated token pair for user {}", identity.user_id);
        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
            token_type: "Bearer".to_string(),
        })
    }

    fn validate_access_token(&self, token: &str) -> TallyResult<Claims> {
        Self::expect_type(self.validate_token(token)?, TokenType::Access)
    }

    fn validate_refresh_token(&self, token: &str) -> TallyResult<Claims> {
        Self::expect_type(self.validate_token(token)?, TokenType::Refresh)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}
