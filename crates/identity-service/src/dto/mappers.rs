//! Entity to DTO mappers

use identity_core::entities::User;

use super::responses::UserResponse;

impl UserResponse {
    /// Project a user for a viewer; the id is only exposed to super admins
    pub fn project(user: &User, include_id: bool) -> Self {
        Self {
            id: include_id.then(|| user.id.to_string()),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            newsletter: user.newsletter,
        }
    }
}
