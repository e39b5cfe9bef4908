//! Fixtures shared by the service unit tests

use std::sync::Arc;

use argon2::Params;
use async_trait::async_trait;
use identity_common::{AuthConfig, PasswordService};
use identity_core::{PasswordResetNotifier, User};
use identity_db::{MemoryStore, SUPER_ADMIN_ROLE_ID};
use parking_lot::Mutex;

use super::context::{ServiceContext, ServiceContextBuilder};

/// Notifier that keeps every `(email, token)` it was handed
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }

    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl PasswordResetNotifier for RecordingNotifier {
    async fn send_password_reset_link(&self, email: &str, token: &str) {
        self.sent.lock().push((email.to_string(), token.to_string()));
    }
}

pub struct TestHarness {
    pub ctx: ServiceContext,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_auth(AuthConfig::default())
    }

    pub fn with_auth(auth: AuthConfig) -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        let params = Params::new(8, 1, 1, None).unwrap();
        let ctx = ServiceContextBuilder::new()
            .memory_store(MemoryStore::new())
            .auth(auth)
            .password_verifier(Arc::new(PasswordService::with_params(params)))
            .notifier(notifier.clone())
            .build()
            .unwrap();
        Self { ctx, notifier }
    }
}

/// Insert a live user directly through the repository
pub async fn register_user(ctx: &ServiceContext, name: &str, email: &str, password: &str) -> User {
    let user = User::new(ctx.generate_id(), name.to_string(), email.to_string());
    let hash = ctx.password_verifier().hash(password).unwrap();
    ctx.user_repo().create(&user, &hash).await.unwrap();
    user
}

pub async fn make_super_admin(ctx: &ServiceContext, user: &User) {
    ctx.role_repo()
        .sync_user_roles(user.id, &[SUPER_ADMIN_ROLE_ID])
        .await
        .unwrap();
}
