//! Account lifecycle for the acting user
//!
//! Registration, login and logout, the profile and newsletter endpoints,
//! self-deletion and the password-reset flow.

use chrono::Utc;
use identity_common::{generate_secret, hash_secret, RESET_SECRET_LENGTH};
use identity_core::{DeletedScope, DomainError, PasswordReset, Snowflake, User};
use tracing::{info, instrument, warn};

use crate::dto::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, NewsletterRequest,
    RegisterRequest, ResetPasswordRequest, UpdateProfileRequest, UserResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::gate::AccessGate;
use super::resolver::CredentialResolver;
use super::token::{AuthenticatedDevice, TokenService};

pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an account and sign it in on the given device
    #[instrument(skip(self, request), fields(name = %request.name, device = %request.device))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        ensure_available(self.ctx, &request.name, &request.email, None).await?;

        let hash = self.ctx.password_verifier().hash(&request.password)?;
        let user = User::new(self.ctx.generate_id(), request.name, request.email);
        self.ctx.user_repo().create(&user, &hash).await?;

        info!(user_id = %user.id, "User registered");

        self.sign_in(&user, request.device).await
    }

    #[instrument(skip(self, request), fields(device = %request.device))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = CredentialResolver::new(self.ctx)
            .resolve(&request.login, &request.password)
            .await?;

        info!(user_id = %user.id, "User logged in");

        self.sign_in(&user, request.device).await
    }

    async fn sign_in(&self, user: &User, device: String) -> ServiceResult<AuthResponse> {
        let token = TokenService::new(self.ctx).issue(user, &device).await?;
        let projection = AccessGate::new(self.ctx).project(user, user).await?;
        Ok(AuthResponse::bearer(token.to_string(), device, projection))
    }

    /// Revoke the token the request was made with
    pub async fn logout(&self, device: &AuthenticatedDevice) -> ServiceResult<MessageResponse> {
        TokenService::new(self.ctx)
            .revoke(device.user.id, &device.device_name)
            .await?;
        Ok(MessageResponse::new("Logged out"))
    }

    pub async fn profile(&self, actor: &User) -> ServiceResult<UserResponse> {
        AccessGate::new(self.ctx).project(actor, actor).await
    }

    /// Change the actor's email; the name and password are not editable here
    #[instrument(skip(self, actor, request), fields(user_id = %actor.id))]
    pub async fn update_profile(
        &self,
        actor: &User,
        request: UpdateProfileRequest,
    ) -> ServiceResult<UserResponse> {
        let mut user = self.current(actor).await?;

        if user.email != request.email {
            if self
                .ctx
                .user_repo()
                .email_exists(&request.email, Some(user.id))
                .await?
            {
                return Err(DomainError::EmailAlreadyExists.into());
            }
            user.set_email(request.email);
            self.ctx.user_repo().update(&user).await?;
            info!("Profile updated");
        }

        AccessGate::new(self.ctx).project(&user, &user).await
    }

    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn update_newsletter(
        &self,
        actor: &User,
        request: NewsletterRequest,
    ) -> ServiceResult<UserResponse> {
        let mut user = self.current(actor).await?;
        user.set_newsletter(request.subscribe);
        self.ctx.user_repo().update(&user).await?;

        info!(subscribed = request.subscribe, "Newsletter preference changed");

        AccessGate::new(self.ctx).project(&user, &user).await
    }

    /// Soft-delete the actor's own account; outstanding tokens stop working at once
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn delete_account(&self, actor: &User) -> ServiceResult<()> {
        if !self.ctx.user_repo().soft_delete(actor.id, Utc::now()).await? {
            return Err(DomainError::UserNotFound(actor.id).into());
        }
        info!("Account soft-deleted by owner");
        Ok(())
    }

    /// Generate a reset secret for a live account and hand it to the notifier
    #[instrument(skip_all)]
    pub async fn request_password_reset(
        &self,
        request: ForgotPasswordRequest,
    ) -> ServiceResult<MessageResponse> {
        let Some(user) = self
            .ctx
            .user_repo()
            .find_by_email(&request.email, DeletedScope::Live)
            .await?
        else {
            warn!("Password reset requested for unknown email");
            return Err(DomainError::ResetLinkUnavailable.into());
        };

        let secret = generate_secret(RESET_SECRET_LENGTH);
        self.ctx
            .reset_repo()
            .store(&PasswordReset::new(user.id, hash_secret(&secret)))
            .await?;

        self.ctx
            .notifier()
            .send_password_reset_link(&user.email, &secret)
            .await;

        info!(user_id = %user.id, "Password reset link issued");
        Ok(MessageResponse::new("Reset link sent"))
    }

    /// Consume a reset secret and set the new password
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        request: ResetPasswordRequest,
    ) -> ServiceResult<MessageResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_email(&request.email, DeletedScope::Live)
            .await?
            .ok_or(DomainError::InvalidResetToken)?;

        let not_before = PasswordReset::not_before(Utc::now(), self.ctx.auth().password_reset_expiry());
        let consumed = self
            .ctx
            .reset_repo()
            .consume(user.id, &hash_secret(&request.token), not_before)
            .await?;

        if !consumed {
            warn!(user_id = %user.id, "Password reset rejected");
            return Err(DomainError::InvalidResetToken.into());
        }

        let hash = self.ctx.password_verifier().hash(&request.password)?;
        self.ctx.user_repo().update_password(user.id, &hash).await?;

        info!(user_id = %user.id, "Password reset");
        Ok(MessageResponse::new("Password reset"))
    }

    /// Re-read the actor so edits start from stored state
    async fn current(&self, actor: &User) -> ServiceResult<User> {
        Ok(self
            .ctx
            .user_repo()
            .find_by_id(actor.id, DeletedScope::Live)
            .await?
            .ok_or(DomainError::Unauthorized)?)
    }
}

/// Reject a name or email held by any account other than `except`, deleted or not
pub(crate) async fn ensure_available(
    ctx: &ServiceContext,
    name: &str,
    email: &str,
    except: Option<Snowflake>,
) -> ServiceResult<()> {
    if ctx.user_repo().name_exists(name, except).await? {
        return Err(DomainError::NameAlreadyExists.into());
    }
    if ctx.user_repo().email_exists(email, except).await? {
        return Err(DomainError::EmailAlreadyExists.into());
    }
    Ok(())
}
