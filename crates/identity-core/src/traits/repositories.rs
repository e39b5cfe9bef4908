//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. User lookups always take a [`DeletedScope`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{DeviceToken, PasswordReset, Role, User};
use crate::error::DomainError;
use crate::value_objects::{DeletedScope, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake, scope: DeletedScope) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, email: &str, scope: DeletedScope) -> RepoResult<Option<User>>;

    async fn find_by_name(&self, name: &str, scope: DeletedScope) -> RepoResult<Option<User>>;

    /// Page through users ordered by id
    async fn list(&self, scope: DeletedScope, limit: i64, offset: i64) -> RepoResult<Vec<User>>;

    async fn count(&self, scope: DeletedScope) -> RepoResult<i64>;

    /// Check whether a name is taken by any account, deleted or not,
    /// other than `except`
    async fn name_exists(&self, name: &str, except: Option<Snowflake>) -> RepoResult<bool>;

    /// Check whether an email is taken by any account, deleted or not,
    /// other than `except`
    async fn email_exists(&self, email: &str, except: Option<Snowflake>) -> RepoResult<bool>;

    /// Create a new user. Duplicate name/email surfaces as a conflict error.
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Create a user and assign its whole role set in one transaction.
    /// An unknown role id fails the call and no user is created.
    async fn create_with_roles(
        &self,
        user: &User,
        password_hash: &str,
        role_ids: &[Snowflake],
    ) -> RepoResult<()>;

    /// Persist name, email and newsletter flag
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Persist profile fields plus, when given, a new password hash and a
    /// replacement role set. Either everything is written or nothing is.
    async fn update_with_roles(
        &self,
        user: &User,
        password_hash: Option<&str>,
        role_ids: Option<&[Snowflake]>,
    ) -> RepoResult<()>;

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()>;

    /// Set `deleted_at` on a live user. Returns false if no live user matched.
    async fn soft_delete(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<bool>;

    /// Clear `deleted_at`. Returns false if the user does not exist at all.
    async fn restore(&self, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Role Repository
// ============================================================================

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Role>>;

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Role>>;

    async fn list(&self) -> RepoResult<Vec<Role>>;

    async fn create(&self, role: &Role) -> RepoResult<()>;

    /// Roles currently assigned to a user
    async fn roles_of(&self, user_id: Snowflake) -> RepoResult<Vec<Role>>;

    /// Slugs of the roles currently assigned to a user
    async fn slugs_of(&self, user_id: Snowflake) -> RepoResult<Vec<String>>;

    /// Replace the user's whole role set atomically. Unknown role ids fail
    /// the sync and leave the previous assignment untouched.
    async fn sync_user_roles(&self, user_id: Snowflake, role_ids: &[Snowflake]) -> RepoResult<()>;
}

// ============================================================================
// Device Token Repository
// ============================================================================

#[async_trait]
pub trait DeviceTokenRepository: Send + Sync {
    /// Store a token, atomically replacing any token for the same
    /// (user, device name) pair.
    async fn replace(&self, token: &DeviceToken) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<DeviceToken>>;

    /// Delete the token for a (user, device name) pair. Returns whether one existed.
    async fn delete(&self, user_id: Snowflake, device_name: &str) -> RepoResult<bool>;

    /// Record that a token was just used
    async fn touch(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()>;

    async fn count_for_user(&self, user_id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Password Reset Repository
// ============================================================================

#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    /// Store a reset, replacing any outstanding one for the same user
    async fn store(&self, reset: &PasswordReset) -> RepoResult<()>;

    /// Delete the user's reset if its hash matches and it was created at or
    /// after `not_before`. Returns whether a reset was consumed.
    async fn consume(
        &self,
        user_id: Snowflake,
        token_hash: &str,
        not_before: DateTime<Utc>,
    ) -> RepoResult<bool>;
}
