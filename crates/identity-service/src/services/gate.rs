//! Authorization gate
//!
//! Super-admin status is read from the user's current role slugs on every
//! check, so a role removed by an admin takes effect on the next request.
//! Self-service operations take no target id; they always act on the
//! authenticated user.

use identity_core::{DomainError, Role, User};
use tracing::{debug, instrument};

use crate::dto::UserResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct AccessGate<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessGate<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn is_super_admin(&self, user: &User) -> ServiceResult<bool> {
        let slugs = self.ctx.role_repo().slugs_of(user.id).await?;
        Ok(Role::grants_super_admin(&slugs))
    }

    pub async fn require_super_admin(&self, actor: &User) -> ServiceResult<()> {
        if self.is_super_admin(actor).await? {
            Ok(())
        } else {
            debug!(user_id = %actor.id, "Admin action refused");
            Err(DomainError::NotSuperAdmin.into())
        }
    }

    /// Project `user` for `viewer`, exposing the id only to super admins
    pub async fn project(&self, viewer: &User, user: &User) -> ServiceResult<UserResponse> {
        let include_id = self.is_super_admin(viewer).await?;
        Ok(UserResponse::project(user, include_id))
    }
}
