/// Schema bootstrap
///
/// Creates the `users` table and the unique index on `username` when they
/// are missing. Runs on every startup and is safe to repeat; there is no
/// versioned migration history.

use sqlx::PgPool;
use tracing::info;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    task_list JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_USERNAME_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS users_username_key ON users (username)";

/// Ensures the `users` table and its unique username index exist
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_USERS_TABLE).execute(pool).await?;
    sqlx::query(CREATE_USERNAME_INDEX).execute(pool).await?;

    info!("User collection schema is in place");
    Ok(())
}
