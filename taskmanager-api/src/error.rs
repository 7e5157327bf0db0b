/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`, so `?` on store, token and
/// password errors yields the right status code.
///
/// Every error body is a JSON object carrying either an `err` or a `msg`
/// field:
///
/// ```json
/// { "err": "User does not exist" }
/// ```
///
/// Internal failures are logged and replaced with a generic message; store
/// and driver error text never reaches the client.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskmanager_shared::{
    auth::{
        jwt::JwtError,
        middleware::{AuthError, INVALID_TOKEN_MESSAGE},
        password::PasswordError,
    },
    store::StoreError,
};
use validator::ValidationErrors;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400), reported in `err`
    BadRequest(String),

    /// Request understood but refused (400), reported in `msg`
    Refused(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Conflict (409) - e.g., duplicate task id
    Conflict(String),

    /// Missing required fields (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message (most failures)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,

    /// Refusal message (duplicate signup, wrong previous password)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,

    /// Per-field validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ErrorResponse {
    fn err(message: String) -> Self {
        Self {
            err: Some(message),
            msg: None,
            details: None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Refused(msg) => write!(f, "Refused: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::err(msg)),
            ApiError::Refused(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    err: None,
                    msg: Some(msg),
                    details: None,
                },
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorResponse::err(msg)),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse::err(msg)),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    err: Some("Request validation failed".to_string()),
                    msg: None,
                    details: Some(errors),
                },
            ),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::err("An internal error occurred".to_string()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Default mapping of store errors
///
/// Handlers whose contract uses a different status or wording for the same
/// condition map those variants themselves before `?`.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername(_) => {
                ApiError::Refused("username already exists".to_string())
            }
            StoreError::UserNotFound(_) => ApiError::BadRequest("cannot find the user".to_string()),
            StoreError::DuplicateTask(_) => {
                ApiError::Conflict("task with this id already exists".to_string())
            }
            StoreError::Database(e) => ApiError::InternalError(format!("Database error: {}", e)),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        tracing::warn!(reason = %err, "Rejected request credentials");
        ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            other => AuthError::InvalidToken(other.to_string()).into(),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(details)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
