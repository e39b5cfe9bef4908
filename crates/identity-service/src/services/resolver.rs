//! Credential resolution
//!
//! Turns a login identifier and password into a live user. Unknown
//! identifiers, deleted accounts and wrong passwords all fail the same way.

use identity_core::{DeletedScope, DomainError, LoginIdentifier, User};
use tracing::{instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct CredentialResolver<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CredentialResolver<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve `login` (email or name) and `password` to a live user
    #[instrument(skip(self, login, password))]
    pub async fn resolve(&self, login: &str, password: &str) -> ServiceResult<User> {
        let identifier = LoginIdentifier::classify(login);
        let users = self.ctx.user_repo();

        let found = match &identifier {
            LoginIdentifier::Email(email) => users.find_by_email(email, DeletedScope::Live).await?,
            LoginIdentifier::Name(name) => users.find_by_name(name, DeletedScope::Live).await?,
        };

        let Some(user) = found else {
            warn!(kind = %identifier, "Login failed: no live account");
            return Err(invalid_credentials());
        };

        let Some(hash) = users.get_password_hash(user.id).await? else {
            warn!(user_id = %user.id, "Login failed: no password hash");
            return Err(invalid_credentials());
        };

        if !self.ctx.password_verifier().verify(password, &hash)? {
            warn!(user_id = %user.id, "Login failed: password mismatch");
            return Err(invalid_credentials());
        }

        Ok(user)
    }
}

fn invalid_credentials() -> ServiceError {
    DomainError::InvalidCredentials.into()
}
