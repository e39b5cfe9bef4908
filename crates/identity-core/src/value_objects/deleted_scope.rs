//! Soft-delete visibility for lookups

use chrono::{DateTime, Utc};

/// Which accounts a lookup may return.
///
/// Every user query takes one explicitly; there is no default scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletedScope {
    /// Only accounts without a deletion timestamp
    Live,
    /// Live and soft-deleted accounts (admin show/restore)
    WithDeleted,
}

impl DeletedScope {
    /// Whether a record with the given deletion marker is visible in this scope
    #[inline]
    pub fn admits(self, deleted_at: Option<DateTime<Utc>>) -> bool {
        match self {
            Self::Live => deleted_at.is_none(),
            Self::WithDeleted => true,
        }
    }

    #[inline]
    pub fn includes_deleted(self) -> bool {
        matches!(self, Self::WithDeleted)
    }
}
