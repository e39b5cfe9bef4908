//! PostgreSQL implementation of RoleRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use identity_core::entities::Role;
use identity_core::error::DomainError;
use identity_core::traits::{RepoResult, RoleRepository};
use identity_core::value_objects::Snowflake;

use crate::models::RoleModel;

use super::error::{map_db_error, map_foreign_key_violation, map_unique_violation};

/// PostgreSQL implementation of RoleRepository
#[derive(Clone)]
pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Role>> {
        let result = sqlx::query_as::<_, RoleModel>(
            r"
            SELECT id, name, slug, created_at FROM roles WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Role::from))
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Role>> {
        let result = sqlx::query_as::<_, RoleModel>(
            r"
            SELECT id, name, slug, created_at FROM roles WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Role::from))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<Role>> {
        let results = sqlx::query_as::<_, RoleModel>(
            r"
            SELECT id, name, slug, created_at FROM roles ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Role::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, role: &Role) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO roles (id, name, slug, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(role.id.into_inner())
        .bind(&role.name)
        .bind(&role.slug)
        .bind(role.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| DomainError::RoleSlugExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn roles_of(&self, user_id: Snowflake) -> RepoResult<Vec<Role>> {
        let results = sqlx::query_as::<_, RoleModel>(
            r"
            SELECT r.id, r.name, r.slug, r.created_at
            FROM roles r
            INNER JOIN role_user ru ON ru.role_id = r.id
            WHERE ru.user_id = $1
            ORDER BY r.id
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Role::from).collect())
    }

    #[instrument(skip(self))]
    async fn slugs_of(&self, user_id: Snowflake) -> RepoResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r"
            SELECT r.slug
            FROM roles r
            INNER JOIN role_user ru ON ru.role_id = r.id
            WHERE ru.user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn sync_user_roles(&self, user_id: Snowflake, role_ids: &[Snowflake]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        sync_roles(&mut *tx, user_id, role_ids).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}

/// Replace a user's role set on an open connection. Callers own the
/// transaction; an error leaves it to be rolled back.
pub(crate) async fn sync_roles(
    conn: &mut PgConnection,
    user_id: Snowflake,
    role_ids: &[Snowflake],
) -> RepoResult<()> {
    let mut wanted: Vec<i64> = role_ids.iter().map(|id| id.into_inner()).collect();
    wanted.sort_unstable();
    wanted.dedup();

    let known = sqlx::query_scalar::<_, i64>(
        r"
        SELECT id FROM roles WHERE id = ANY($1)
        ",
    )
    .bind(&wanted)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_error)?;

    if let Some(missing) = wanted.iter().find(|id| !known.contains(id)) {
        return Err(DomainError::UnknownRole(Snowflake::new(*missing)));
    }

    sqlx::query(
        r"
        DELETE FROM role_user WHERE user_id = $1 AND NOT (role_id = ANY($2))
        ",
    )
    .bind(user_id.into_inner())
    .bind(&wanted)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    sqlx::query(
        r"
        INSERT INTO role_user (user_id, role_id)
        SELECT $1, UNNEST($2::BIGINT[])
        ON CONFLICT (user_id, role_id) DO NOTHING
        ",
    )
    .bind(user_id.into_inner())
    .bind(&wanted)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_foreign_key_violation(e, || DomainError::UserNotFound(user_id)))?;

    Ok(())
}
