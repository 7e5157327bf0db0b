/// PostgreSQL plumbing for the user store
///
/// # Modules
///
/// - `pool`: connection pool creation with a startup health check
/// - `schema`: idempotent creation of the `users` table and its unique
///   username index

pub mod pool;
pub mod schema;
