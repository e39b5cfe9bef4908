//! Admin user management
//!
//! Every operation takes the acting user and checks the super-admin gate
//! before looking at the target, so non-admins cannot learn which ids exist.

use chrono::Utc;
use identity_core::{DeletedScope, DomainError, Snowflake, User};
use tracing::{info, instrument};

use crate::dto::{
    AdminCreateUserRequest, AdminUpdateUserRequest, PaginatedResponse, UserResponse,
};

use super::account::ensure_available;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::gate::AccessGate;

pub struct AdminUserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminUserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Confirm `actor` may use the admin surface
    pub async fn authorize(&self, actor: &User) -> ServiceResult<()> {
        AccessGate::new(self.ctx).require_super_admin(actor).await
    }

    /// Live users, one page at a time; pages start at 1
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn list(
        &self,
        actor: &User,
        page: i64,
    ) -> ServiceResult<PaginatedResponse<UserResponse>> {
        self.authorize(actor).await?;

        let page = page.max(1);
        let per_page = self.ctx.auth().admin_page_size.max(1);
        let users = self.ctx.user_repo();

        let total = users.count(DeletedScope::Live).await?;
        let items = users
            .list(DeletedScope::Live, per_page, (page - 1) * per_page)
            .await?;

        Ok(PaginatedResponse::new(
            items.iter().map(admin_view).collect(),
            page,
            per_page,
            total,
        ))
    }

    /// Any user, including soft-deleted ones
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn show(&self, actor: &User, id: Snowflake) -> ServiceResult<UserResponse> {
        self.authorize(actor).await?;
        let user = self.find(id, DeletedScope::WithDeleted).await?;
        Ok(admin_view(&user))
    }

    #[instrument(skip(self, actor, request), fields(actor_id = %actor.id, name = %request.name))]
    pub async fn create(
        &self,
        actor: &User,
        request: AdminCreateUserRequest,
    ) -> ServiceResult<UserResponse> {
        self.authorize(actor).await?;
        ensure_available(self.ctx, &request.name, &request.email, None).await?;

        let hash = self.ctx.password_verifier().hash(&request.password)?;
        let user = User::new(self.ctx.generate_id(), request.name, request.email);
        let roles = request.roles.unwrap_or_default();
        self.ctx
            .user_repo()
            .create_with_roles(&user, &hash, &roles)
            .await?;

        info!(user_id = %user.id, "User created by admin");
        Ok(admin_view(&user))
    }

    /// Partial update of a live user; `roles` replaces the whole role set
    #[instrument(skip(self, actor, request), fields(actor_id = %actor.id))]
    pub async fn update(
        &self,
        actor: &User,
        id: Snowflake,
        request: AdminUpdateUserRequest,
    ) -> ServiceResult<UserResponse> {
        self.authorize(actor).await?;
        let mut user = self.find(id, DeletedScope::Live).await?;
        let users = self.ctx.user_repo();

        if let Some(name) = request.name {
            if name != user.name && users.name_exists(&name, Some(id)).await? {
                return Err(DomainError::NameAlreadyExists.into());
            }
            user.set_name(name);
        }
        if let Some(email) = request.email {
            if email != user.email && users.email_exists(&email, Some(id)).await? {
                return Err(DomainError::EmailAlreadyExists.into());
            }
            user.set_email(email);
        }

        let hash = match &request.password {
            Some(password) => Some(self.ctx.password_verifier().hash(password)?),
            None => None,
        };
        users
            .update_with_roles(&user, hash.as_deref(), request.roles.as_deref())
            .await?;

        info!(user_id = %id, "User updated by admin");
        Ok(admin_view(&user))
    }

    /// Soft-delete a live user
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn destroy(&self, actor: &User, id: Snowflake) -> ServiceResult<()> {
        self.authorize(actor).await?;
        if !self.ctx.user_repo().soft_delete(id, Utc::now()).await? {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, "User soft-deleted by admin");
        Ok(())
    }

    /// Clear the deletion mark; restoring a live user is a no-op
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn restore(&self, actor: &User, id: Snowflake) -> ServiceResult<UserResponse> {
        self.authorize(actor).await?;
        let mut user = self.find(id, DeletedScope::WithDeleted).await?;

        if user.is_deleted() {
            self.ctx.user_repo().restore(id).await?;
            user.restore();
            info!(user_id = %id, "User restored by admin");
        }

        Ok(admin_view(&user))
    }

    async fn find(&self, id: Snowflake, scope: DeletedScope) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(id, scope)
            .await?
            .ok_or_else(|| user_not_found(id))
    }
}

/// The viewer has passed the gate, so ids are always shown
fn admin_view(user: &User) -> UserResponse {
    UserResponse::project(user, true)
}

fn user_not_found(id: Snowflake) -> ServiceError {
    ServiceError::not_found("User", id.to_string())
}
