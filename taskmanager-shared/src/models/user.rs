/// User documents
///
/// A user document holds the login credentials and the user's whole task
/// list. Usernames are case-sensitive and unique across the collection.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username TEXT NOT NULL,
///     password_hash TEXT NOT NULL,
///     task_list JSONB NOT NULL DEFAULT '[]'::jsonb,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE UNIQUE INDEX users_username_key ON users (username);
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::task::Task;

/// A user and the tasks embedded in it
///
/// The password hash never leaves the server: it is skipped when the
/// document is serialized for a response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-generated document id
    pub id: Uuid,

    pub username: String,

    /// Argon2id PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Ordered task list, empty for a new user
    pub task_list: Vec<Task>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,

    /// Argon2id hash (NOT the plaintext password)
    pub password_hash: String,
}
