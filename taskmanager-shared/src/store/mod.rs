/// User document store
///
/// Handlers reach the store only through the [`UserStore`] trait, held as
/// an `Arc<dyn UserStore>` in the application state.
///
/// # Backends
///
/// - [`postgres::PgUserStore`]: one `users` table with the task list kept
///   as a JSONB array
/// - [`memory::MemoryUserStore`]: a locked `HashMap`, for tests and local
///   runs without a database
///
/// # Atomicity
///
/// Every task-list mutation is a single store operation keyed by username
/// and task id. Implementations must not read the list, change it in
/// memory, and write it back in separate steps, or concurrent requests for
/// the same user could lose updates.

use async_trait::async_trait;

use crate::models::{
    task::Task,
    user::{NewUser, User},
};

pub mod memory;
pub mod postgres;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Username is already taken
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    /// No user with this username
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// The user already has a task with this id
    #[error("task already exists: {0}")]
    DuplicateTask(String),

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Operations on the collection of user documents
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Checks that the backing store is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Fetches a user document by exact username
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Inserts a new user with an empty task list
    ///
    /// Fails with `DuplicateUsername` if the name is taken, including when
    /// another request inserted it first.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    /// Renames a user in place, keeping credentials and tasks
    async fn rename_user(&self, username: &str, new_username: &str) -> StoreResult<()>;

    /// Replaces the stored password hash
    async fn set_password_hash(&self, username: &str, password_hash: &str) -> StoreResult<()>;

    /// Returns the user's task list in stored order
    async fn list_tasks(&self, username: &str) -> StoreResult<Vec<Task>>;

    /// Appends a task, failing with `DuplicateTask` if its id is in use
    async fn add_task(&self, username: &str, task: Task) -> StoreResult<()>;

    /// Removes every task with `task.id` and appends `task`
    ///
    /// Appends even when no task had that id.
    async fn replace_task(&self, username: &str, task: Task) -> StoreResult<()>;

    /// Removes every task with this id, keeping the others in order
    async fn remove_task(&self, username: &str, task_id: &str) -> StoreResult<()>;
}
