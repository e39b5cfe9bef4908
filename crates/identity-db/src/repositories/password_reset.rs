//! PostgreSQL implementation of PasswordResetRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use identity_core::entities::PasswordReset;
use identity_core::error::DomainError;
use identity_core::traits::{PasswordResetRepository, RepoResult};
use identity_core::value_objects::Snowflake;

use super::error::{map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of PasswordResetRepository
#[derive(Clone)]
pub struct PgPasswordResetRepository {
    pool: PgPool,
}

impl PgPasswordResetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordResetRepository for PgPasswordResetRepository {
    #[instrument(skip(self, reset), fields(user_id = %reset.user_id))]
    async fn store(&self, reset: &PasswordReset) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO password_resets (user_id, token_hash, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET token_hash = EXCLUDED.token_hash, created_at = EXCLUDED.created_at
            ",
        )
        .bind(reset.user_id.into_inner())
        .bind(&reset.token_hash)
        .bind(reset.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::UserNotFound(reset.user_id)))?;

        Ok(())
    }

    #[instrument(skip(self, token_hash))]
    async fn consume(
        &self,
        user_id: Snowflake,
        token_hash: &str,
        not_before: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let consumed = sqlx::query_scalar::<_, i64>(
            r"
            DELETE FROM password_resets
            WHERE user_id = $1 AND token_hash = $2 AND created_at >= $3
            RETURNING user_id
            ",
        )
        .bind(user_id.into_inner())
        .bind(token_hash)
        .bind(not_before)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(consumed.is_some())
    }
}
