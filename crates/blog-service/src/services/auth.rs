//! Authentication service
//!
//! Registration, login, refresh token rotation and logout. Refresh tokens are
//! tracked server-side by their `jti`, so a rotated or revoked token is
//! rejected even before it expires.

use blog_common::auth::validate_password_strength;
use blog_common::AppError;
use blog_core::entities::{RefreshSession, User};
use blog_core::{DomainError, Snowflake};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user and open a session
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();

        if !User::is_valid_username(&username) {
            return Err(DomainError::InvalidUsername(username).into());
        }
        validate_password_strength(&request.password)?;

        let users = self.ctx.user_repo();
        if users.email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }
        if users.username_exists(&username).await? {
            return Err(DomainError::UsernameAlreadyExists.into());
        }

        let password_hash = self.ctx.password_service().hash(&request.password)?;
        let user = User::new(self.ctx.generate_id(), username, email);
        users.create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User registered");
        self.open_session(&user, Uuid::new_v4().to_string()).await
    }

    /// Exchange email and password for a token pair
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let users = self.ctx.user_repo();

        let Some(user) = users.find_by_email(request.email.trim()).await? else {
            warn!("Login failed: unknown email");
            return Err(AppError::InvalidCredentials.into());
        };
        let Some(password_hash) = users.get_password_hash(user.id).await? else {
            warn!(user_id = %user.id, "Login failed: no password hash");
            return Err(AppError::InvalidCredentials.into());
        };

        self.ctx
            .password_service()
            .verify_or_error(&request.password, &password_hash)
            .inspect_err(|_| warn!(user_id = %user.id, "Login failed: wrong password"))?;

        info!(user_id = %user.id, "User logged in");
        self.open_session(&user, Uuid::new_v4().to_string()).await
    }

    /// Rotate a refresh token. The presented token is revoked and a new pair is
    /// issued for the same session.
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let user_id = claims.user_id()?;

        let store = self.ctx.token_store();
        let session = store
            .get(&claims.jti)
            .await?
            .filter(|session| session.user_id == user_id)
            .ok_or(AppError::InvalidToken)?;

        // Losing a concurrent rotation of the same token
        if !store.revoke(&claims.jti).await? {
            return Err(AppError::InvalidToken.into());
        }

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        info!(user_id = %user.id, "Refresh token rotated");
        self.open_session(&user, session.session_id).await
    }

    /// Revoke one refresh token, or every session of the user without one
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(
        &self,
        user_id: Snowflake,
        refresh_token: Option<String>,
    ) -> ServiceResult<()> {
        let store = self.ctx.token_store();

        match refresh_token {
            Some(token) => {
                let claims = self.ctx.jwt_service().validate_refresh_token(&token)?;
                if claims.user_id()? != user_id {
                    return Err(AppError::InvalidToken.into());
                }
                store.revoke(&claims.jti).await?;
                info!(user_id = %user_id, "Session revoked");
            }
            None => {
                let revoked = store.revoke_all_for_user(user_id).await?;
                info!(user_id = %user_id, revoked, "All sessions revoked");
            }
        }

        Ok(())
    }

    async fn open_session(&self, user: &User, session_id: String) -> ServiceResult<AuthResponse> {
        let jwt = self.ctx.jwt_service();
        let tokens = jwt.generate_token_pair(user.id, &session_id)?;
        let ttl = u64::try_from(jwt.refresh_token_expiry()).unwrap_or(0);

        self.ctx
            .token_store()
            .store(
                &tokens.refresh_token_id,
                &RefreshSession::new(user.id, session_id),
                ttl,
            )
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to store session: {e}")))?;

        Ok(AuthResponse::new(tokens, user))
    }
}
