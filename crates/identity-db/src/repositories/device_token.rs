//! PostgreSQL implementation of DeviceTokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use identity_core::entities::DeviceToken;
use identity_core::error::DomainError;
use identity_core::traits::{DeviceTokenRepository, RepoResult};
use identity_core::value_objects::Snowflake;

use crate::models::DeviceTokenModel;

use super::error::{map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of DeviceTokenRepository
#[derive(Clone)]
pub struct PgDeviceTokenRepository {
    pool: PgPool,
}

impl PgDeviceTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceTokenRepository for PgDeviceTokenRepository {
    /// One statement: the (user, device) row is overwritten in place, so the
    /// previous token id stops resolving the moment the new one exists.
    #[instrument(skip(self, token), fields(user_id = %token.user_id, device = %token.device_name))]
    async fn replace(&self, token: &DeviceToken) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO device_tokens (id, user_id, device_name, token_hash, created_at, last_used_at)
            VALUES ($1, $2, $3, $4, $5, NULL)
            ON CONFLICT (user_id, device_name) DO UPDATE
            SET id = EXCLUDED.id,
                token_hash = EXCLUDED.token_hash,
                created_at = EXCLUDED.created_at,
                last_used_at = NULL
            ",
        )
        .bind(token.id.into_inner())
        .bind(token.user_id.into_inner())
        .bind(&token.device_name)
        .bind(&token.token_hash)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::UserNotFound(token.user_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<DeviceToken>> {
        let result = sqlx::query_as::<_, DeviceTokenModel>(
            r"
            SELECT id, user_id, device_name, token_hash, created_at, last_used_at
            FROM device_tokens
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(DeviceToken::from))
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: Snowflake, device_name: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM device_tokens WHERE user_id = $1 AND device_name = $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(device_name)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn touch(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE device_tokens SET last_used_at = $2 WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_for_user(&self, user_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM device_tokens WHERE user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
