//! Device token issuance, revocation and bearer authentication

use chrono::Utc;
use identity_common::{AppError, PlainToken};
use identity_core::{DeletedScope, DeviceToken, Snowflake, User};
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// A request authenticated by a device token
#[derive(Debug, Clone)]
pub struct AuthenticatedDevice {
    pub user: User,
    pub token_id: Snowflake,
    pub device_name: String,
}

pub struct TokenService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TokenService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Issue a token for `(user, device)`, replacing any earlier one for the pair
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn issue(&self, user: &User, device_name: &str) -> ServiceResult<PlainToken> {
        let plain = PlainToken::generate(self.ctx.generate_id());
        let token = DeviceToken::new(
            plain.id,
            user.id,
            device_name.to_string(),
            plain.secret_hash(),
        );

        self.ctx.token_repo().replace(&token).await?;

        info!(token_id = %plain.id, "Device token issued");
        Ok(plain)
    }

    /// Revoke the token for `(user, device)`; revoking nothing is not an error
    #[instrument(skip(self))]
    pub async fn revoke(&self, user_id: Snowflake, device_name: &str) -> ServiceResult<()> {
        if self.ctx.token_repo().delete(user_id, device_name).await? {
            info!("Device token revoked");
        }
        Ok(())
    }

    /// Resolve a raw bearer token to its live owner
    ///
    /// Malformed, unknown, replaced and revoked tokens, and tokens whose owner
    /// is soft-deleted, are all rejected with 401.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, raw: &str) -> ServiceResult<AuthenticatedDevice> {
        let plain = PlainToken::parse(raw).ok_or(AppError::InvalidToken)?;

        let token = self
            .ctx
            .token_repo()
            .find_by_id(plain.id)
            .await?
            .filter(|t| t.token_hash == plain.secret_hash())
            .ok_or_else(|| {
                debug!(token_id = %plain.id, "Unknown or replaced token");
                AppError::InvalidToken
            })?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(token.user_id, DeletedScope::Live)
            .await?
            .ok_or_else(|| {
                debug!(user_id = %token.user_id, "Token owner is not live");
                AppError::Unauthorized
            })?;

        self.ctx.token_repo().touch(token.id, Utc::now()).await?;

        Ok(AuthenticatedDevice {
            user,
            token_id: token.id,
            device_name: token.device_name,
        })
    }
}
