//! User repository: the storage collaborator of the user service.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Email lookups ignore ASCII case; nickname lookups are exact. `create` and
/// `update` enforce both uniqueness rules atomically with the write and
/// fail with `Conflict` on a clash with another user.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find user by nickname
    async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<User>>;

    /// Persist a new user; rejects a taken email or nickname
    async fn create(&self, user: User) -> AppResult<User>;

    /// Replace a stored user; rejects a taken email or nickname
    async fn update(&self, user: User) -> AppResult<User>;

    /// Delete user by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List users ordered by creation time
    async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<User>>;

    /// Count stored users
    async fn count(&self) -> AppResult<u64>;
}

/// Process-local repository backed by a map.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Check `user` against every other stored user. Caller holds the write lock.
fn ensure_unique(users: &HashMap<Uuid, User>, user: &User) -> AppResult<()> {
    let others = || users.values().filter(|u| u.id != user.id);

    if others().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
        return Err(AppError::conflict("User with this email"));
    }
    if others().any(|u| u.nickname == user.nickname) {
        return Err(AppError::conflict("User with this nickname"));
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.nickname == nickname).cloned())
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(AppError::conflict("User"));
        }
        ensure_unique(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(AppError::NotFound);
        }
        ensure_unique(&users, &user)?;
        match users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(user)
            }
            None => Err(AppError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| (u.created_at, u.id));
        Ok(all
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }
}
