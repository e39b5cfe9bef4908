//! Default password-reset notifier

use async_trait::async_trait;
use identity_core::PasswordResetNotifier;
use tracing::info;

/// Writes the reset link to the log instead of sending mail
#[derive(Debug, Clone)]
pub struct LogNotifier {
    app_url: String,
}

impl LogNotifier {
    pub fn new(app_url: impl Into<String>) -> Self {
        Self {
            app_url: app_url.into(),
        }
    }

    pub fn reset_link(&self, email: &str, token: &str) -> String {
        format!(
            "{}/reset-password?token={token}&email={email}",
            self.app_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl PasswordResetNotifier for LogNotifier {
    async fn send_password_reset_link(&self, email: &str, token: &str) {
        info!(%email, link = %self.reset_link(email, token), "Password reset link issued");
    }
}
