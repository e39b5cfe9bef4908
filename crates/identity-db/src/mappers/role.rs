//! Role model -> entity mapper

use identity_core::entities::Role;
use identity_core::value_objects::Snowflake;

use crate::models::RoleModel;

impl From<RoleModel> for Role {
    fn from(model: RoleModel) -> Self {
        Role {
            id: Snowflake::new(model.id),
            name: model.name,
            slug: model.slug,
            created_at: model.created_at,
        }
    }
}
