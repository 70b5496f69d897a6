//! Authentication service
//!
//! Handles registration, login and token refresh. Sessions are stateless:
//! a refresh token is honoured as long as its signature and expiry hold.

use event_common::auth::validate_password_strength;
use event_common::AppError;
use event_core::{NewUser, UserId};
use tracing::{info, instrument, warn};

use crate::dto::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user and sign them in
    #[instrument(skip(self, request), fields(login = %request.login))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        validate_password_strength(&request.password)?;

        let password_hash = self.ctx.password_service().hash(&request.password)?;

        // Duplicate logins surface as LoginTaken from the unique index.
        let user = self
            .ctx
            .user_repo()
            .create(&NewUser::new(request.login, request.email), &password_hash)
            .await?;

        info!(user_id = %user.id, "User registered");

        let pair = self.ctx.jwt_service().generate_token_pair(user.id)?;
        Ok(AuthResponse::new(pair, UserResponse::from(user)))
    }

    /// Login with login name and password
    #[instrument(skip(self, request), fields(login = %request.login))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_login(&request.login)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown login");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidCredentials))?;

        self.ctx
            .password_service()
            .verify_or_error(&request.password, &password_hash)
            .inspect_err(|_| warn!(user_id = %user.id, "Login failed: wrong password"))?;

        info!(user_id = %user.id, "User logged in");

        let pair = self.ctx.jwt_service().generate_token_pair(user.id)?;
        Ok(AuthResponse::new(pair, UserResponse::from(user)))
    }

    /// Exchange a refresh token for a new pair
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let pair = self.ctx.jwt_service().refresh_tokens(&request.refresh_token)?;

        // The account may have been deleted since the token was issued.
        let claims = self.ctx.jwt_service().validate_access_token(&pair.access_token)?;
        let user = self.current_user(claims.user_id()?).await?;

        Ok(AuthResponse::new(pair, user))
    }

    /// Load the profile of an authenticated user
    #[instrument(skip(self))]
    pub async fn current_user(&self, user_id: UserId) -> ServiceResult<UserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;

        Ok(UserResponse::from(user))
    }
}
