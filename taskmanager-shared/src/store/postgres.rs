/// PostgreSQL user store
///
/// One row per user document in the `users` table; the task list lives in a
/// JSONB array column. Task mutations are single `UPDATE` statements that
/// rebuild the array from the row's current value, so the row lock taken by
/// the update serializes concurrent mutations of the same user.
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskmanager_shared::store::postgres::PgUserStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store = PgUserStore::new(pool);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::{StoreError, StoreResult, UserStore};
use crate::db::pool::health_check;
use crate::models::{
    task::Task,
    user::{NewUser, User},
};

/// Row shape of the `users` table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    task_list: Json<Vec<Task>>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            task_list: row.task_list.0,
            created_at: row.created_at,
        }
    }
}

/// Maps a unique-index violation on `username` to `DuplicateUsername`
fn map_unique_violation(err: sqlx::Error, username: &str) -> StoreError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateUsername(username.to_string())
        }
        other => StoreError::Database(other),
    }
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn user_exists(&self, username: &str) -> StoreResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash,
                   COALESCE(task_list, '[]'::jsonb) AS task_list, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, task_list, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &user.username))?;

        Ok(row.into())
    }

    async fn rename_user(&self, username: &str, new_username: &str) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET username = $2 WHERE username = $1")
            .bind(username)
            .bind(new_username)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, new_username))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(username.to_string()));
        }

        Ok(())
    }

    async fn set_password_hash(&self, username: &str, password_hash: &str) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE username = $1")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(username.to_string()));
        }

        Ok(())
    }

    async fn list_tasks(&self, username: &str) -> StoreResult<Vec<Task>> {
        let tasks: Option<(Json<Vec<Task>>,)> = sqlx::query_as(
            "SELECT COALESCE(task_list, '[]'::jsonb) FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        tasks
            .map(|(Json(tasks),)| tasks)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))
    }

    async fn add_task(&self, username: &str, task: Task) -> StoreResult<()> {
        // The id check sits in the WHERE clause, so it is re-evaluated against
        // the latest row version if another update got there first.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET task_list = COALESCE(task_list, '[]'::jsonb) || jsonb_build_array($2::jsonb)
            WHERE username = $1
              AND NOT EXISTS (
                  SELECT 1
                  FROM jsonb_array_elements(COALESCE(task_list, '[]'::jsonb)) AS elem
                  WHERE elem->>'id' = $3
              )
            "#,
        )
        .bind(username)
        .bind(Json(&task))
        .bind(&task.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return if self.user_exists(username).await? {
                Err(StoreError::DuplicateTask(task.id))
            } else {
                Err(StoreError::UserNotFound(username.to_string()))
            };
        }

        Ok(())
    }

    async fn replace_task(&self, username: &str, task: Task) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET task_list = COALESCE(
                    (SELECT jsonb_agg(elem ORDER BY pos)
                     FROM jsonb_array_elements(COALESCE(task_list, '[]'::jsonb))
                          WITH ORDINALITY AS t(elem, pos)
                     WHERE elem->>'id' IS DISTINCT FROM $2),
                    '[]'::jsonb
                ) || jsonb_build_array($3::jsonb)
            WHERE username = $1
            "#,
        )
        .bind(username)
        .bind(&task.id)
        .bind(Json(&task))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(username.to_string()));
        }

        Ok(())
    }

    async fn remove_task(&self, username: &str, task_id: &str) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET task_list = COALESCE(
                    (SELECT jsonb_agg(elem ORDER BY pos)
                     FROM jsonb_array_elements(COALESCE(task_list, '[]'::jsonb))
                          WITH ORDINALITY AS t(elem, pos)
                     WHERE elem->>'id' IS DISTINCT FROM $2),
                    '[]'::jsonb
                )
            WHERE username = $1
            "#,
        )
        .bind(username)
        .bind(task_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(username.to_string()));
        }

        Ok(())
    }
}
