//! Password reset - one outstanding single-use reset per user

use chrono::{DateTime, Duration, Utc};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
    pub user_id: Snowflake,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

impl PasswordReset {
    pub fn new(user_id: Snowflake, token_hash: String) -> Self {
        Self {
            user_id,
            token_hash,
            created_at: Utc::now(),
        }
    }

    /// Oldest creation time still accepted for a reset with the given lifetime
    pub fn not_before(now: DateTime<Utc>, lifetime: Duration) -> DateTime<Utc> {
        now - lifetime
    }

    pub fn is_expired(&self, now: DateTime<Utc>, lifetime: Duration) -> bool {
        self.created_at < Self::not_before(now, lifetime)
    }
}
