//! Opaque bearer secrets
//!
//! Device tokens are handed out as `"{token_id}|{secret}"`. Only the SHA-256
//! of the secret is stored, so a leaked table cannot be replayed.

use std::fmt;

use identity_core::Snowflake;
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

pub const DEVICE_SECRET_LENGTH: usize = 40;
pub const RESET_SECRET_LENGTH: usize = 64;

/// Random alphanumeric secret of the given length
pub fn generate_secret(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Hex SHA-256 of a secret, the form that gets persisted
pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Device token in the form given to clients
#[derive(Clone, PartialEq, Eq)]
pub struct PlainToken {
    pub id: Snowflake,
    pub secret: String,
}

impl PlainToken {
    /// Fresh token for a persisted token id
    pub fn generate(id: Snowflake) -> Self {
        Self {
            id,
            secret: generate_secret(DEVICE_SECRET_LENGTH),
        }
    }

    /// Parse `"{id}|{secret}"`; `None` for anything else
    pub fn parse(raw: &str) -> Option<Self> {
        let (id, secret) = raw.trim().split_once('|')?;
        if secret.is_empty() || !secret.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self {
            id: Snowflake::parse(id).ok()?,
            secret: secret.to_string(),
        })
    }

    pub fn secret_hash(&self) -> String {
        hash_secret(&self.secret)
    }
}

impl fmt::Display for PlainToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.id, self.secret)
    }
}

impl fmt::Debug for PlainToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainToken")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
