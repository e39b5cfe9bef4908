//! Device token model -> entity mapper

use identity_core::entities::DeviceToken;
use identity_core::value_objects::Snowflake;

use crate::models::DeviceTokenModel;

impl From<DeviceTokenModel> for DeviceToken {
    fn from(model: DeviceTokenModel) -> Self {
        DeviceToken {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            device_name: model.device_name,
            token_hash: model.token_hash,
            created_at: model.created_at,
            last_used_at: model.last_used_at,
        }
    }
}
