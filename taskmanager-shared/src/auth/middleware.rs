/// Bearer extraction and per-request authentication context
///
/// The API's auth guard calls [`bearer_token`] to pull the token out of the
/// `Authorization` header, verifies it, and inserts an [`AuthContext`] into
/// the request extensions. Handlers then take `AuthContext` as an extractor.
///
/// Every authentication failure renders the same client-facing body,
/// `{"err": "Invalid JWT Token"}` with status 401; the variant only matters
/// for logging.
///
/// # Example
///
/// ```
/// use taskmanager_shared::auth::middleware::AuthContext;
///
/// async fn handler(auth: AuthContext) -> String {
///     format!("Hello, {}!", auth.username)
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::jwt::Claims;

/// Message returned for every authentication failure
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid JWT Token";

/// Identity attached to a request after its token verified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Username carried by the token
    pub username: String,
}

impl AuthContext {
    /// Creates auth context from verified claims
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            username: claims.username,
        }
    }
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable bearer token on the request
    #[error("missing bearer token")]
    MissingCredentials,

    /// Token present but failed verification
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "err": INVALID_TOKEN_MESSAGE })),
        )
            .into_response()
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
///
/// A missing header, a different scheme, or an empty token all count as
/// missing credentials.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingCredentials)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}
