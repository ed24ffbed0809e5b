//! Authentication service trait definition.

use crate::dto::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, UserResponse};
use async_trait::async_trait;
use tally_core::{Interface, TallyResult, UserId};
use tally_security::Claims;

/// Authentication service trait.
#[async_trait]
pub trait AuthService: Interface {
    /// Registers a new user and signs them in.
    async fn register(&self, request: RegisterRequest) -> TallyResult<AuthResponse>;

    /// Logs in with a username or email and a password.
    async fn login(&self, request: LoginRequest) -> TallyResult<AuthResponse>;

    /// Exchanges a refresh token for a new token pair.
    async fn refresh_token(&self, request: RefreshTokenRequest) -> TallyResult<AuthResponse>;

    /// Validates an access token and returns its claims.
    fn validate_token(&self, token: &str) -> TallyResult<Claims>;

    /// Returns the profile of an authenticated user.
    async fn get_current_user(&self, user_id: UserId) -> TallyResult<UserResponse>;
}
