use validator::Validate;

use crate::entities::envelope::Envelope;
use crate::entities::token::AuthResponse;
use crate::entities::user::{ChangePassword, LoginUser, NewUser, PublicUser, User};
use crate::errors::{AppError, AuthError};
use crate::interfaces::repositories::user::UserRepository;
use crate::auth::password::{hash_password, verify_password};
use crate::repositories::token::TokenServiceRepository;

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub user_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub fn new(user_repo: R, token_service: T) -> Self {
        AuthHandler {
            user_repo,
            token_service,
        }
    }

    /// Registers a regular user and signs them in.
    pub async fn register(&self, request: NewUser) -> Envelope<AuthResponse> {
        Envelope::from_result(self.try_register(request).await, "Registration failed")
            .with_message("User registered successfully")
    }

    async fn try_register(&self, request: NewUser) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let hashed_password = hash_password(&request.password)?;
        let user_insert = request.prepare_for_insert(hashed_password);

        let user = self.user_repo.create_user(&user_insert).await?;
        tracing::info!(user_id = user.id, "User registered");

        Ok(self.create_auth_response(user)?)
    }

    /// Logs in by username or email. Unknown users and wrong passwords are
    /// indistinguishable to the caller.
    pub async fn login(&self, request: LoginUser) -> Envelope<AuthResponse> {
        Envelope::from_result(self.try_login(request).await, "Login failed")
            .with_message("Login successful")
    }

    async fn try_login(&self, request: LoginUser) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let user = self.user_repo
            .get_user_by_login(request.username.trim())
            .await?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|e| {
                tracing::warn!(user_id = user.id, "Stored password hash rejected: {}", e);
                AuthError::WrongCredentials
            })?;
        if !is_password_valid {
            tracing::warn!(user_id = user.id, "Failed login attempt");
            return Err(AuthError::WrongCredentials.into());
        }

        tracing::info!(user_id = user.id, "User logged in successfully");
        Ok(self.create_auth_response(user)?)
    }

    pub async fn current_user(&self, user_id: u64) -> Envelope<PublicUser> {
        Envelope::from_result(self.find_user(user_id).await.map(PublicUser::from), "Failed to fetch user")
    }

    /// Replaces the password after checking the current one.
    pub async fn change_password(&self, user_id: u64, request: ChangePassword) -> Envelope<()> {
        Envelope::from_unit(
            self.try_change_password(user_id, request).await,
            "Password changed successfully",
            "Failed to change password",
        )
    }

    async fn try_change_password(&self, user_id: u64, request: ChangePassword) -> Result<(), AppError> {
        request.validate()?;

        let user = self.find_user(user_id).await?;

        if !verify_password(&request.current_password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Current password is incorrect".into()));
        }

        let new_hash = hash_password(&request.new_password)?;
        self.user_repo.update_password(user.id, &new_hash).await?;

        tracing::info!(user_id = user.id, "Password changed");
        Ok(())
    }

    async fn find_user(&self, user_id: u64) -> Result<User, AppError> {
        self.user_repo
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    pub fn create_auth_response(&self, user: User) -> Result<AuthResponse, AuthError> {
        let token = self.token_service.create_jwt(&user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        Ok(AuthResponse::new(PublicUser::from(user), token))
    }
}
