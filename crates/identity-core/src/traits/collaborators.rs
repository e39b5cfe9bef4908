//! Non-storage collaborators: password hashing and reset-link delivery

use async_trait::async_trait;

use crate::error::DomainError;

/// One-way password hashing
pub trait PasswordVerifier: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, DomainError>;

    /// `Ok(false)` for a wrong password; `Err` only for an unreadable hash
    fn verify(&self, plain: &str, hash: &str) -> Result<bool, DomainError>;
}

/// Delivers a password-reset secret to its owner.
///
/// Fire-and-forget: delivery problems are the notifier's to handle and
/// never flow back to the caller.
#[async_trait]
pub trait PasswordResetNotifier: Send + Sync {
    async fn send_password_reset_link(&self, email: &str, token: &str);
}
