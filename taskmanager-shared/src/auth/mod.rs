/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: bearer token signing and verification with rotatable secrets
/// - [`middleware`]: bearer extraction and the per-request `AuthContext`
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::auth::password::{hash_password, verify_password};
/// use taskmanager_shared::auth::jwt::JwtKeys;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let keys = JwtKeys::new("a-secret-that-is-at-least-32-bytes-long");
/// let token = keys.issue("alice")?;
/// assert_eq!(keys.verify(&token)?.username, "alice");
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
