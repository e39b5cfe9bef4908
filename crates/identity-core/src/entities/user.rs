//! User entity - an account that can sign in and be administered

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// User account
///
/// `name` and `email` are unique across live and soft-deleted accounts.
/// The password hash is not part of the entity; repositories expose it
/// separately so it never travels with ordinary reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub name: String,
    pub email: String,
    pub newsletter: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new live account, not subscribed to the newsletter
    pub fn new(id: Snowflake, name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            newsletter: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Soft-deleted accounts cannot authenticate
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_email(&mut self, email: String) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    pub fn set_newsletter(&mut self, subscribe: bool) {
        self.newsletter = subscribe;
        self.updated_at = Utc::now();
    }

    /// Mark the account deleted; a no-op if it already is
    pub fn soft_delete(&mut self) {
        if self.deleted_at.is_none() {
            let now = Utc::now();
            self.deleted_at = Some(now);
            self.updated_at = now;
        }
    }

    pub fn restore(&mut self) {
        if self.deleted_at.take().is_some() {
            self.updated_at = Utc::now();
        }
    }
}
