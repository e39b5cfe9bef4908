//! In-memory store
//!
//! Implements every repository trait over one `parking_lot` mutex, so each
//! call is atomic the same way a single SQL statement or transaction is.
//! Used by the service tests and the HTTP test server.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use identity_core::entities::{DeviceToken, PasswordReset, Role, User};
use identity_core::error::DomainError;
use identity_core::traits::{
    DeviceTokenRepository, PasswordResetRepository, RepoResult, RoleRepository, UserRepository,
};
use identity_core::value_objects::{DeletedScope, Snowflake};

/// Id of the `SUPER_ADMIN` role seeded by the initial migration
pub const SUPER_ADMIN_ROLE_ID: Snowflake = Snowflake::new(1);

#[derive(Default)]
struct State {
    users: BTreeMap<Snowflake, StoredUser>,
    roles: BTreeMap<Snowflake, Role>,
    role_user: BTreeSet<(Snowflake, Snowflake)>,
    tokens: HashMap<Snowflake, DeviceToken>,
    resets: HashMap<Snowflake, PasswordReset>,
}

struct StoredUser {
    user: User,
    password_hash: String,
}

impl State {
    fn conflict_for(&self, name: &str, email: &str, except: Option<Snowflake>) -> Option<DomainError> {
        let others = self.users.values().filter(|s| Some(s.user.id) != except);
        for stored in others {
            if stored.user.name == name {
                return Some(DomainError::NameAlreadyExists);
            }
            if stored.user.email == email {
                return Some(DomainError::EmailAlreadyExists);
            }
        }
        None
    }

    fn find_user<P>(&self, scope: DeletedScope, pred: P) -> Option<User>
    where
        P: Fn(&User) -> bool,
    {
        self.users
            .values()
            .map(|s| &s.user)
            .find(|u| scope.admits(u.deleted_at) && pred(u))
            .cloned()
    }

    fn live_user_mut(&mut self, id: Snowflake) -> Option<&mut StoredUser> {
        self.users.get_mut(&id).filter(|s| !s.user.is_deleted())
    }

    fn check_roles(&self, role_ids: &[Snowflake]) -> RepoResult<()> {
        match role_ids.iter().find(|id| !self.roles.contains_key(id)) {
            Some(missing) => Err(DomainError::UnknownRole(*missing)),
            None => Ok(()),
        }
    }

    fn check_insert(&self, user: &User) -> RepoResult<()> {
        if let Some(conflict) = self.conflict_for(&user.name, &user.email, None) {
            return Err(conflict);
        }
        if self.users.contains_key(&user.id) {
            return Err(DomainError::DatabaseError(format!("duplicate user id {}", user.id)));
        }
        Ok(())
    }

    fn check_update(&self, user: &User) -> RepoResult<()> {
        if let Some(conflict) = self.conflict_for(&user.name, &user.email, Some(user.id)) {
            return Err(conflict);
        }
        match self.users.get(&user.id) {
            Some(stored) if !stored.user.is_deleted() => Ok(()),
            _ => Err(DomainError::UserNotFound(user.id)),
        }
    }

    fn replace_roles(&mut self, user_id: Snowflake, role_ids: &[Snowflake]) {
        self.role_user.retain(|(user, _)| *user != user_id);
        self.role_user
            .extend(role_ids.iter().map(|role| (user_id, *role)));
    }

    /// Callers run `check_update` first
    fn write_profile(&mut self, user: &User, password_hash: Option<&str>) {
        if let Some(stored) = self.live_user_mut(user.id) {
            stored.user.name.clone_from(&user.name);
            stored.user.email.clone_from(&user.email);
            stored.user.newsletter = user.newsletter;
            stored.user.updated_at = Utc::now();
            if let Some(hash) = password_hash {
                stored.password_hash = hash.to_string();
            }
        }
    }
}

/// Thread-safe in-memory implementation of all repositories
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store with the `SUPER_ADMIN` role already present
    pub fn new() -> Self {
        let mut state = State::default();
        state.roles.insert(
            SUPER_ADMIN_ROLE_ID,
            Role::new(
                SUPER_ADMIN_ROLE_ID,
                "Super admin".to_string(),
                Role::SUPER_ADMIN.to_string(),
            ),
        );
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake, scope: DeletedScope) -> RepoResult<Option<User>> {
        Ok(self.state.lock().find_user(scope, |u| u.id == id))
    }

    async fn find_by_email(&self, email: &str, scope: DeletedScope) -> RepoResult<Option<User>> {
        Ok(self.state.lock().find_user(scope, |u| u.email == email))
    }

    async fn find_by_name(&self, name: &str, scope: DeletedScope) -> RepoResult<Option<User>> {
        Ok(self.state.lock().find_user(scope, |u| u.name == name))
    }

    async fn list(&self, scope: DeletedScope, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
        let state = self.state.lock();
        Ok(state
            .users
            .values()
            .map(|s| &s.user)
            .filter(|u| scope.admits(u.deleted_at))
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn count(&self, scope: DeletedScope) -> RepoResult<i64> {
        let state = self.state.lock();
        let count = state
            .users
            .values()
            .filter(|s| scope.admits(s.user.deleted_at))
            .count();
        Ok(count as i64)
    }

    async fn name_exists(&self, name: &str, except: Option<Snowflake>) -> RepoResult<bool> {
        let state = self.state.lock();
        Ok(state
            .users
            .values()
            .any(|s| s.user.name == name && Some(s.user.id) != except))
    }

    async fn email_exists(&self, email: &str, except: Option<Snowflake>) -> RepoResult<bool> {
        let state = self.state.lock();
        Ok(state
            .users
            .values()
            .any(|s| s.user.email == email && Some(s.user.id) != except))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        self.create_with_roles(user, password_hash, &[]).await
    }

    async fn create_with_roles(
        &self,
        user: &User,
        password_hash: &str,
        role_ids: &[Snowflake],
    ) -> RepoResult<()> {
        let mut state = self.state.lock();
        state.check_roles(role_ids)?;
        state.check_insert(user)?;
        state.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        state.replace_roles(user.id, role_ids);
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        self.update_with_roles(user, None, None).await
    }

    async fn update_with_roles(
        &self,
        user: &User,
        password_hash: Option<&str>,
        role_ids: Option<&[Snowflake]>,
    ) -> RepoResult<()> {
        let mut state = self.state.lock();
        state.check_update(user)?;
        if let Some(roles) = role_ids {
            state.check_roles(roles)?;
        }
        state.write_profile(user, password_hash);
        if let Some(roles) = role_ids {
            state.replace_roles(user.id, roles);
        }
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self
            .state
            .lock()
            .users
            .get(&id)
            .map(|s| s.password_hash.clone()))
    }

    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        let mut state = self.state.lock();
        let stored = state
            .live_user_mut(id)
            .ok_or(DomainError::UserNotFound(id))?;
        stored.password_hash = password_hash.to_string();
        stored.user.updated_at = Utc::now();
        Ok(())
    }

    async fn soft_delete(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<bool> {
        let mut state = self.state.lock();
        Ok(match state.live_user_mut(id) {
            Some(stored) => {
                stored.user.deleted_at = Some(at);
                stored.user.updated_at = at;
                true
            }
            None => false,
        })
    }

    async fn restore(&self, id: Snowflake) -> RepoResult<bool> {
        let mut state = self.state.lock();
        Ok(match state.users.get_mut(&id) {
            Some(stored) => {
                stored.user.restore();
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl RoleRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Role>> {
        Ok(self.state.lock().roles.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Role>> {
        Ok(self
            .state
            .lock()
            .roles
            .values()
            .find(|r| r.slug == slug)
            .cloned())
    }

    async fn list(&self) -> RepoResult<Vec<Role>> {
        Ok(self.state.lock().roles.values().cloned().collect())
    }

    async fn create(&self, role: &Role) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.roles.values().any(|r| r.slug == role.slug) {
            return Err(DomainError::RoleSlugExists);
        }
        state.roles.insert(role.id, role.clone());
        Ok(())
    }

    async fn roles_of(&self, user_id: Snowflake) -> RepoResult<Vec<Role>> {
        let state = self.state.lock();
        Ok(state
            .role_user
            .iter()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, role)| state.roles.get(role).cloned())
            .collect())
    }

    async fn slugs_of(&self, user_id: Snowflake) -> RepoResult<Vec<String>> {
        Ok(RoleRepository::roles_of(self, user_id)
            .await?
            .into_iter()
            .map(|role| role.slug)
            .collect())
    }

    async fn sync_user_roles(&self, user_id: Snowflake, role_ids: &[Snowflake]) -> RepoResult<()> {
        let mut state = self.state.lock();
        state.check_roles(role_ids)?;
        if !state.users.contains_key(&user_id) {
            return Err(DomainError::UserNotFound(user_id));
        }
        state.replace_roles(user_id, role_ids);
        Ok(())
    }
}

#[async_trait]
impl DeviceTokenRepository for MemoryStore {
    async fn replace(&self, token: &DeviceToken) -> RepoResult<()> {
        let mut state = self.state.lock();
        if !state.users.contains_key(&token.user_id) {
            return Err(DomainError::UserNotFound(token.user_id));
        }
        state
            .tokens
            .retain(|_, t| !(t.user_id == token.user_id && t.device_name == token.device_name));
        state.tokens.insert(token.id, token.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<DeviceToken>> {
        Ok(self.state.lock().tokens.get(&id).cloned())
    }

    async fn delete(&self, user_id: Snowflake, device_name: &str) -> RepoResult<bool> {
        let mut state = self.state.lock();
        let before = state.tokens.len();
        state
            .tokens
            .retain(|_, t| !(t.user_id == user_id && t.device_name == device_name));
        Ok(state.tokens.len() < before)
    }

    async fn touch(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()> {
        if let Some(token) = self.state.lock().tokens.get_mut(&id) {
            token.last_used_at = Some(at);
        }
        Ok(())
    }

    async fn count_for_user(&self, user_id: Snowflake) -> RepoResult<i64> {
        let state = self.state.lock();
        Ok(state.tokens.values().filter(|t| t.user_id == user_id).count() as i64)
    }
}

#[async_trait]
impl PasswordResetRepository for MemoryStore {
    async fn store(&self, reset: &PasswordReset) -> RepoResult<()> {
        let mut state = self.state.lock();
        if !state.users.contains_key(&reset.user_id) {
            return Err(DomainError::UserNotFound(reset.user_id));
        }
        state.resets.insert(reset.user_id, reset.clone());
        Ok(())
    }

    async fn consume(
        &self,
        user_id: Snowflake,
        token_hash: &str,
        not_before: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let mut state = self.state.lock();
        let matches = state
            .resets
            .get(&user_id)
            .is_some_and(|r| r.token_hash == token_hash && r.created_at >= not_before);
        if matches {
            state.resets.remove(&user_id);
        }
        Ok(matches)
    }
}
