//! Path parameter extractors

use identity_core::Snowflake;
use serde::Deserialize;

use crate::response::ApiError;

/// `/admin/users/:id`
#[derive(Debug, Deserialize)]
pub struct UserIdPath {
    pub id: String,
}

impl UserIdPath {
    /// An id that is not a positive integer cannot name a user
    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        self.id
            .parse()
            .map_err(|_| ApiError::UnknownResource("User"))
    }
}
