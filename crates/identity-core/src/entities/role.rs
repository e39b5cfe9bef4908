//! Role entity - an authorization label assigned to users

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub name: String,
    /// Machine-stable identifier, e.g. `SUPER_ADMIN`
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Slug that grants access to the admin surface
    pub const SUPER_ADMIN: &'static str = "SUPER_ADMIN";

    pub fn new(id: Snowflake, name: String, slug: String) -> Self {
        Self {
            id,
            name,
            slug,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_super_admin(&self) -> bool {
        self.slug == Self::SUPER_ADMIN
    }

    /// True iff any of the slugs is `SUPER_ADMIN`
    pub fn grants_super_admin<S: AsRef<str>>(slugs: &[S]) -> bool {
        slugs.iter().any(|slug| slug.as_ref() == Self::SUPER_ADMIN)
    }
}
