/// Bearer token signing and verification
///
/// Tokens are HS256 JWTs whose payload carries the username. The signing
/// secret is supplied by the caller (never compiled in) and can be rotated:
/// [`JwtKeys`] signs with the current secret and also accepts tokens signed
/// by any retired secret it was given.
///
/// # Expiration
///
/// Tokens carry `exp` only when a lifetime is configured. Without one they
/// stay valid until the secret that signed them is retired.
///
/// # Example
///
/// ```
/// use taskmanager_shared::auth::jwt::JwtKeys;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let old = JwtKeys::new("old-secret-key-at-least-32-bytes-long!");
/// let token = old.issue("alice")?;
///
/// let rotated = JwtKeys::new("new-secret-key-at-least-32-bytes-long!")
///     .with_previous_secrets(vec!["old-secret-key-at-least-32-bytes-long!".to_string()]);
///
/// assert_eq!(rotated.verify(&token)?.username, "alice");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature did not match any accepted secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Malformed token or payload
    #[error("Failed to validate token: {0}")]
    ValidationError(String),
}

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp), absent for non-expiring tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Creates non-expiring claims for a username
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            iat: Utc::now().timestamp(),
            exp: None,
        }
    }

    /// Creates claims that expire after `expires_in`
    ///
    /// Fails when the expiry falls outside the representable date range.
    pub fn with_expiration(
        username: impl Into<String>,
        expires_in: Duration,
    ) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(expires_in)
            .ok_or_else(|| JwtError::CreateError("Token lifetime is out of range".to_string()))?;

        Ok(Self {
            username: username.into(),
            iat: now.timestamp(),
            exp: Some(exp.timestamp()),
        })
    }
}

/// Signs claims with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies a token against a single secret and returns its claims
///
/// `exp` is checked when present; tokens without it are accepted.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Signing secret plus the retired secrets still accepted for verification
#[derive(Clone)]
pub struct JwtKeys {
    current: String,
    previous: Vec<String>,
    lifetime: Option<Duration>,
}

impl JwtKeys {
    /// Creates keys that sign and verify with `secret`
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            current: secret.into(),
            previous: Vec::new(),
            lifetime: None,
        }
    }

    /// Accepts tokens signed by these retired secrets
    pub fn with_previous_secrets(mut self, secrets: Vec<String>) -> Self {
        self.previous = secrets;
        self
    }

    /// Issues tokens that expire after `lifetime` (`None` = never)
    pub fn with_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Signs a token for `username` with the current secret
    pub fn issue(&self, username: &str) -> Result<String, JwtError> {
        let claims = match self.lifetime {
            Some(lifetime) => Claims::with_expiration(username, lifetime)?,
            None => Claims::new(username),
        };

        create_token(&claims, &self.current)
    }

    /// Verifies a token against the current secret, then each retired one
    ///
    /// Only a signature mismatch moves on to the next secret; an expired or
    /// malformed token fails immediately.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        for secret in std::iter::once(&self.current).chain(self.previous.iter()) {
            match validate_token(token, secret) {
                Err(JwtError::InvalidSignature) => continue,
                result => return result,
            }
        }

        Err(JwtError::InvalidSignature)
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("current", &"[REDACTED]")
            .field("previous", &self.previous.len())
            .field("lifetime", &self.lifetime)
            .finish()
    }
}
