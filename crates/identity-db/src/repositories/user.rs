//! PostgreSQL implementation of UserRepository
//!
//! Scope is bound as a parameter: `($n OR deleted_at IS NULL)` admits
//! soft-deleted rows only when the caller asked for them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use identity_core::entities::User;
use identity_core::error::DomainError;
use identity_core::traits::{RepoResult, UserRepository};
use identity_core::value_objects::{DeletedScope, Snowflake};

use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation, user_conflict};
use super::role::sync_roles;

const USER_COLUMNS: &str = "id, name, email, newsletter, created_at, updated_at, deleted_at";

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(
        &self,
        column: &'static str,
        value: impl for<'q> sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send + 'static,
        scope: DeletedScope,
    ) -> RepoResult<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {column} = $1 AND ($2 OR deleted_at IS NULL)"
        );
        let result = sqlx::query_as::<_, UserModel>(&sql)
            .bind(value)
            .bind(scope.includes_deleted())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake, scope: DeletedScope) -> RepoResult<Option<User>> {
        self.find_one("id", id.into_inner(), scope).await
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str, scope: DeletedScope) -> RepoResult<Option<User>> {
        self.find_one("email", email.to_string(), scope).await
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str, scope: DeletedScope) -> RepoResult<Option<User>> {
        self.find_one("name", name.to_string(), scope).await
    }

    #[instrument(skip(self))]
    async fn list(&self, scope: DeletedScope, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE ($1 OR deleted_at IS NULL) \
             ORDER BY id LIMIT $2 OFFSET $3"
        );
        let results = sqlx::query_as::<_, UserModel>(&sql)
            .bind(scope.includes_deleted())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, scope: DeletedScope) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM users WHERE ($1 OR deleted_at IS NULL)
            ",
        )
        .bind(scope.includes_deleted())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn name_exists(&self, name: &str, except: Option<Snowflake>) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM users WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2))
            ",
        )
        .bind(name)
        .bind(except.map(Snowflake::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str, except: Option<Snowflake>) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2))
            ",
        )
        .bind(email)
        .bind(except.map(Snowflake::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, password_hash), fields(user_id = %user.id))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        insert_user(&self.pool, user, password_hash).await
    }

    #[instrument(skip(self, password_hash), fields(user_id = %user.id))]
    async fn create_with_roles(
        &self,
        user: &User,
        password_hash: &str,
        role_ids: &[Snowflake],
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        insert_user(&mut *tx, user, password_hash).await?;
        sync_roles(&mut *tx, user.id, role_ids).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        update_profile(&self.pool, user).await
    }

    #[instrument(skip(self, password_hash), fields(user_id = %user.id))]
    async fn update_with_roles(
        &self,
        user: &User,
        password_hash: Option<&str>,
        role_ids: Option<&[Snowflake]>,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        update_profile(&mut *tx, user).await?;
        if let Some(hash) = password_hash {
            set_password(&mut *tx, user.id, hash).await?;
        }
        if let Some(roles) = role_ids {
            sync_roles(&mut *tx, user.id, roles).await?;
        }
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash FROM users WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        set_password(&self.pool, id, password_hash).await
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET deleted_at = $2, updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id.into_inner())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn restore(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET updated_at = CASE WHEN deleted_at IS NULL THEN updated_at ELSE NOW() END,
                deleted_at = NULL
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

async fn insert_user<'e, E: PgExecutor<'e>>(
    executor: E,
    user: &User,
    password_hash: &str,
) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO users (id, name, email, password_hash, newsletter, created_at, updated_at, deleted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ",
    )
    .bind(user.id.into_inner())
    .bind(&user.name)
    .bind(&user.email)
    .bind(password_hash)
    .bind(user.newsletter)
    .bind(user.created_at)
    .bind(user.updated_at)
    .bind(user.deleted_at)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, user_conflict))?;

    Ok(())
}

async fn update_profile<'e, E: PgExecutor<'e>>(executor: E, user: &User) -> RepoResult<()> {
    let result = sqlx::query(
        r"
        UPDATE users
        SET name = $2, email = $3, newsletter = $4, updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        ",
    )
    .bind(user.id.into_inner())
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.newsletter)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, user_conflict))?;

    if result.rows_affected() == 0 {
        return Err(DomainError::UserNotFound(user.id));
    }

    Ok(())
}

/// Only live users can have their password changed
async fn set_password<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Snowflake,
    password_hash: &str,
) -> RepoResult<()> {
    let result = sqlx::query(
        r"
        UPDATE users
        SET password_hash = $2, updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        ",
    )
    .bind(id.into_inner())
    .bind(password_hash)
    .execute(executor)
    .await
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(DomainError::UserNotFound(id));
    }

    Ok(())
}
