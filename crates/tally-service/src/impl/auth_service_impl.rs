//! Authentication service implementation.

use crate::auth_service::AuthService;
use crate::dto::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, UserResponse};
use async_trait::async_trait;
use chrono::Utc;
use shaku::Component;
use std::sync::Arc;
use tally_core::{Email, TallyError, TallyResult, User, UserId, ValidateExt};
use tally_repository::UserRepository;
use tally_security::{Claims, PasswordHasherInterface, TokenIdentity, TokenProviderInterface};
use tracing::{debug, info, warn};

/// Authentication service component.
#[derive(Component)]
#[shaku(interface = AuthService)]
pub struct AuthServiceComponent {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,
    #[shaku(inject)]
    token_provider: Arc<dyn TokenProviderInterface>,
}

impl AuthServiceComponent {
    /// Creates the service outside of a DI module.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        token_provider: Arc<dyn TokenProviderInterface>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_provider,
        }
    }

    fn create_auth_response(&self, user: &User) -> TallyResult<AuthResponse> {
        let tokens = self.token_provider.generate_tokens(TokenIdentity {
            user_id: user.id,
            username: &user.username,
            email: user.email.as_str(),
        })?;

        Ok(AuthResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: (tokens.access_expires_at - Utc::now()).num_seconds().max(0),
            user: UserResponse::from(user),
        })
    }

    async fn find_user(&self, user_id: UserId) -> TallyResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| TallyError::not_found("User", user_id))
    }
}

#[async_trait]
impl AuthService for AuthServiceComponent {
    async fn register(&self, request: RegisterRequest) -> TallyResult<AuthResponse> {
        debug!("Registering user: {}", request.username);

        request.validate_request()?;

        if self.user_repository.exists_by_username(&request.username).await? {
            return Err(TallyError::conflict(format!(
                "Username '{}' already exists",
                request.username
            )));
        }

        let email = Email::new(&request.email)?;
        if self.user_repository.exists_by_email(email.as_str()).await? {
            return Err(TallyError::conflict(format!("Email '{email}' already exists")));
        }

        let password_hash = self.password_hasher.hash(&request.password)?;
        let user = User::new(request.username, email, password_hash);
        let saved = self.user_repository.save(&user).await?;

        info!("User registered: {}", saved.id);
        self.create_auth_response(&saved)
    }

    async fn login(&self, request: LoginRequest) -> TallyResult<AuthResponse> {
        debug!("Login attempt for: {}", request.username_or_email);

        request.validate_request()?;

        let user = self
            .user_repository
            .find_by_username_or_email(&request.username_or_email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: user not found - {}", request.username_or_email);
                TallyError::InvalidCredentials
            })?;

        if !self.password_hasher.verify(&request.password, &user.password_hash)? {
            warn!("Login failed: invalid password - {}", user.id);
            return Err(TallyError::InvalidCredentials);
        }

        info!("User logged in: {}", user.id);
        self.create_auth_response(&user)
    }

    async fn refresh_token(&self, request: RefreshTokenRequest) -> TallyResult<AuthResponse> {
        debug!("Refreshing token");

        let claims = self.token_provider.validate_refresh_token(&request.refresh_token)?;
        let user_id = claims
            .user_id()
            .ok_or_else(|| TallyError::InvalidToken("Invalid refresh token: missing user ID".to_string()))?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| TallyError::InvalidToken("User no longer exists".to_string()))?;

        info!("Token refreshed for user: {}", user.id);
        self.create_auth_response(&user)
    }

    fn validate_token(&self, token: &str) -> TallyResult<Claims> {
        self.token_provider.validate_access_token(token)
    }

    async fn get_current_user(&self, user_id: UserId) -> TallyResult<UserResponse> {
        let user = self.find_user(user_id).await?;
        Ok(UserResponse::from(&user))
    }
}

impl std::fmt::Debug for AuthServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceComponent").finish_non_exhaustive()
    }
}
