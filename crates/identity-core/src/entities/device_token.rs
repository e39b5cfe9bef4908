//! Device token - a bearer credential bound to one user and one device name

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Persisted form of a device token. Only the hash of the secret is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceToken {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub device_name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl DeviceToken {
    pub fn new(id: Snowflake, user_id: Snowflake, device_name: String, token_hash: String) -> Self {
        Self {
            id,
            user_id,
            device_name,
            token_hash,
            created_at: Utc::now(),
            last_used_at: None,
        }
    }
}
