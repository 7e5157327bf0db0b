/// Data models
///
/// # Models
///
/// - `user`: user documents (credentials plus embedded task list)
/// - `task`: task records embedded in a user document

pub mod task;
pub mod user;
