/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /signup` - Create an account and get a token
/// - `POST /login` - Exchange credentials for a token
///
/// Both take `{"username": ..., "password": ...}` and answer
/// `{"jwtToken": ...}` on success.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::AppJson,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskmanager_shared::{auth::password, models::user::NewUser};
use validator::Validate;

/// Signup and login request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CredentialsRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Token response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub jwt_token: String,
}

/// Register a new user
///
/// ```text
/// POST /signup
/// Content-Type: application/json
///
/// { "username": "al", "password": "pw1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing field, or `{"msg":"username already exists"}`
/// - `500 Internal Server Error`: store failure
pub async fn signup(
    State(state): State<AppState>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    if state.store.find_by_username(&req.username).await?.is_some() {
        return Err(ApiError::Refused("username already exists".to_string()));
    }

    let password_hash = password::hash_in_background(req.password).await?;
    let jwt_token = state.jwt().issue(&req.username)?;

    // A concurrent signup that wins the unique index surfaces as DuplicateUsername
    let user = state
        .store
        .create_user(NewUser {
            username: req.username,
            password_hash,
        })
        .await?;

    tracing::info!(username = %user.username, user_id = %user.id, "User signed up");

    Ok(Json(TokenResponse { jwt_token }))
}

/// Log in with username and password
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// { "username": "al", "password": "pw1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `User does not exist`, `Incorrect Password`, or a
///   missing field
/// - `500 Internal Server Error`: store failure
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let user = state
        .store
        .find_by_username(&req.username)
        .await?
        .ok_or_else(|| ApiError::BadRequest("User does not exist".to_string()))?;

    if !password::verify_in_background(req.password, user.password_hash).await? {
        tracing::info!(username = %user.username, "Login rejected: wrong password");
        return Err(ApiError::BadRequest("Incorrect Password".to_string()));
    }

    let jwt_token = state.jwt().issue(&user.username)?;
    tracing::info!(username = %user.username, "User logged in");

    Ok(Json(TokenResponse { jwt_token }))
}
