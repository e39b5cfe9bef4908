//! Service context - dependency container for services
//!
//! Holds the repositories, the password hasher, the reset-link notifier and
//! the id generator shared by every service.

use std::sync::Arc;

use identity_common::AuthConfig;
use identity_core::traits::{
    DeviceTokenRepository, PasswordResetNotifier, PasswordResetRepository, PasswordVerifier,
    RoleRepository, UserRepository,
};
use identity_core::{Snowflake, SnowflakeGenerator};
use identity_db::{MemoryStore, PgPool};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// The pool is optional: a context backed by [`MemoryStore`] has none, and
/// readiness checks then report the database as not configured.
#[derive(Clone)]
pub struct ServiceContext {
    pool: Option<PgPool>,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    role_repo: Arc<dyn RoleRepository>,
    token_repo: Arc<dyn DeviceTokenRepository>,
    reset_repo: Arc<dyn PasswordResetRepository>,

    // Collaborators
    password_verifier: Arc<dyn PasswordVerifier>,
    notifier: Arc<dyn PasswordResetNotifier>,
    snowflake_generator: Arc<SnowflakeGenerator>,

    auth: AuthConfig,
    app_url: String,
}

impl ServiceContext {
    // === Database Pool ===

    /// PostgreSQL pool, when the context is database-backed
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn role_repo(&self) -> &dyn RoleRepository {
        self.role_repo.as_ref()
    }

    pub fn token_repo(&self) -> &dyn DeviceTokenRepository {
        self.token_repo.as_ref()
    }

    pub fn reset_repo(&self) -> &dyn PasswordResetRepository {
        self.reset_repo.as_ref()
    }

    // === Collaborators ===

    pub fn password_verifier(&self) -> &dyn PasswordVerifier {
        self.password_verifier.as_ref()
    }

    pub fn notifier(&self) -> &dyn PasswordResetNotifier {
        self.notifier.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    // === Settings ===

    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    /// Public base URL used in reset links
    pub fn app_url(&self) -> &str {
        &self.app_url
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("auth", &self.auth)
            .field("app_url", &self.app_url)
            .finish()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    role_repo: Option<Arc<dyn RoleRepository>>,
    token_repo: Option<Arc<dyn DeviceTokenRepository>>,
    reset_repo: Option<Arc<dyn PasswordResetRepository>>,
    password_verifier: Option<Arc<dyn PasswordVerifier>>,
    notifier: Option<Arc<dyn PasswordResetNotifier>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    auth: AuthConfig,
    app_url: String,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            user_repo: None,
            role_repo: None,
            token_repo: None,
            reset_repo: None,
            password_verifier: None,
            notifier: None,
            snowflake_generator: None,
            auth: AuthConfig::default(),
            app_url: "http://localhost".to_string(),
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn role_repo(mut self, repo: Arc<dyn RoleRepository>) -> Self {
        self.role_repo = Some(repo);
        self
    }

    pub fn token_repo(mut self, repo: Arc<dyn DeviceTokenRepository>) -> Self {
        self.token_repo = Some(repo);
        self
    }

    pub fn reset_repo(mut self, repo: Arc<dyn PasswordResetRepository>) -> Self {
        self.reset_repo = Some(repo);
        self
    }

    /// Use one in-memory store for all four repositories
    pub fn memory_store(self, store: MemoryStore) -> Self {
        let store = Arc::new(store);
        self.user_repo(store.clone())
            .role_repo(store.clone())
            .token_repo(store.clone())
            .reset_repo(store)
    }

    pub fn password_verifier(mut self, verifier: Arc<dyn PasswordVerifier>) -> Self {
        self.password_verifier = Some(verifier);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn PasswordResetNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    pub fn app_url(mut self, url: impl Into<String>) -> Self {
        self.app_url = url.into();
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            pool: self.pool,
            user_repo: required(self.user_repo, "user_repo")?,
            role_repo: required(self.role_repo, "role_repo")?,
            token_repo: required(self.token_repo, "token_repo")?,
            reset_repo: required(self.reset_repo, "reset_repo")?,
            password_verifier: required(self.password_verifier, "password_verifier")?,
            notifier: required(self.notifier, "notifier")?,
            snowflake_generator: self
                .snowflake_generator
                .unwrap_or_else(|| Arc::new(SnowflakeGenerator::default())),
            auth: self.auth,
            app_url: self.app_url,
        })
    }
}

fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
    value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
