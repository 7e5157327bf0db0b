/// In-memory user store
///
/// Keeps user documents in a `HashMap` behind a tokio `RwLock`. Each
/// mutation runs entirely under one write guard, which gives the same
/// per-operation atomicity as the PostgreSQL statements.
///
/// Used to exercise the HTTP layer without a database.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskmanager_shared::store::{memory::MemoryUserStore, UserStore};
///
/// let store: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
/// ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, StoreResult, UserStore};
use crate::models::{
    task::Task,
    user::{NewUser, User},
};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
    operations: AtomicUsize,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations served so far
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.record();
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        self.record();
        let mut users = self.users.write().await;

        if users.contains_key(&user.username) {
            return Err(StoreError::DuplicateUsername(user.username));
        }

        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            task_list: Vec::new(),
            created_at: Utc::now(),
        };
        users.insert(created.username.clone(), created.clone());

        Ok(created)
    }

    async fn rename_user(&self, username: &str, new_username: &str) -> StoreResult<()> {
        self.record();
        let mut users = self.users.write().await;

        if users.contains_key(new_username) {
            return Err(StoreError::DuplicateUsername(new_username.to_string()));
        }

        let mut user = users
            .remove(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;
        user.username = new_username.to_string();
        users.insert(user.username.clone(), user);

        Ok(())
    }

    async fn set_password_hash(&self, username: &str, password_hash: &str) -> StoreResult<()> {
        self.record();
        let mut users = self.users.write().await;

        let user = users
            .get_mut(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;
        user.password_hash = password_hash.to_string();

        Ok(())
    }

    async fn list_tasks(&self, username: &str) -> StoreResult<Vec<Task>> {
        self.record();
        self.users
            .read()
            .await
            .get(username)
            .map(|user| user.task_list.clone())
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))
    }

    async fn add_task(&self, username: &str, task: Task) -> StoreResult<()> {
        self.record();
        let mut users = self.users.write().await;

        let user = users
            .get_mut(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;

        if user.task_list.iter().any(|existing| existing.id == task.id) {
            return Err(StoreError::DuplicateTask(task.id));
        }
        user.task_list.push(task);

        Ok(())
    }

    async fn replace_task(&self, username: &str, task: Task) -> StoreResult<()> {
        self.record();
        let mut users = self.users.write().await;

        let user = users
            .get_mut(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;

        user.task_list.retain(|existing| existing.id != task.id);
        user.task_list.push(task);

        Ok(())
    }

    async fn remove_task(&self, username: &str, task_id: &str) -> StoreResult<()> {
        self.record();
        let mut users = self.users.write().await;

        let user = users
            .get_mut(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;
        user.task_list.retain(|existing| existing.id != task_id);

        Ok(())
    }
}
