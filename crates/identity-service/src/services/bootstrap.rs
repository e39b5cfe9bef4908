//! Startup provisioning of the first super admin

use identity_common::BootstrapAdminConfig;
use identity_core::{DeletedScope, DomainError, Role, User};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct BootstrapService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BootstrapService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Make sure the configured account exists and holds `SUPER_ADMIN`
    ///
    /// Safe to run on every start: an existing account keeps its password
    /// and its other roles. A soft-deleted account is restored.
    #[instrument(skip_all, fields(email = %config.email))]
    pub async fn ensure_super_admin(&self, config: &BootstrapAdminConfig) -> ServiceResult<User> {
        let users = self.ctx.user_repo();
        let roles = self.ctx.role_repo();

        let user = match users.find_by_email(&config.email, DeletedScope::WithDeleted).await? {
            Some(mut user) if user.is_deleted() => {
                warn!(user_id = %user.id, "Bootstrap admin account was soft-deleted, restoring it");
                users.restore(user.id).await?;
                user.restore();
                user
            }
            Some(user) => user,
            None => {
                let hash = self.ctx.password_verifier().hash(&config.password)?;
                let user = User::new(self.ctx.generate_id(), config.name.clone(), config.email.clone());
                users.create(&user, &hash).await?;
                info!(user_id = %user.id, "Bootstrap admin account created");
                user
            }
        };

        let super_admin = roles
            .find_by_slug(Role::SUPER_ADMIN)
            .await?
            .ok_or_else(|| DomainError::InternalError("SUPER_ADMIN role is missing".to_string()))?;

        let mut assigned: Vec<_> = roles.roles_of(user.id).await?.into_iter().map(|r| r.id).collect();
        if !assigned.contains(&super_admin.id) {
            assigned.push(super_admin.id);
            roles.sync_user_roles(user.id, &assigned).await?;
            info!(user_id = %user.id, "SUPER_ADMIN granted to bootstrap account");
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::gate::AccessGate;
    use crate::services::resolver::CredentialResolver;
    use chrono::Utc;
    use crate::services::test_support::TestHarness;

    fn config() -> BootstrapAdminConfig {
        BootstrapAdminConfig {
            name: "rootadmin".to_string(),
            email: "root@x.com".to_string(),
            password: "password".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ensure_super_admin_is_idempotent() {
        let h = TestHarness::new();
        let svc = BootstrapService::new(&h.ctx);

        let first = svc.ensure_super_admin(&config()).await.unwrap();
        let second = svc.ensure_super_admin(&config()).await.unwrap();

        assert_eq!(first.id, second.id);
        assert!(AccessGate::new(&h.ctx).is_super_admin(&first).await.unwrap());
        assert_eq!(h.ctx.role_repo().slugs_of(first.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_super_admin_restores_deleted_account() {
        let h = TestHarness::new();
        let svc = BootstrapService::new(&h.ctx);
        let first = svc.ensure_super_admin(&config()).await.unwrap();
        h.ctx.user_repo().soft_delete(first.id, Utc::now()).await.unwrap();

        let second = svc.ensure_super_admin(&config()).await.unwrap();
        assert_eq!(second.id, first.id);
        assert!(!second.is_deleted());

        let resolved = CredentialResolver::new(&h.ctx)
            .resolve("root@x.com", "password")
            .await
            .unwrap();
        assert_eq!(resolved.id, first.id);
    }
}
