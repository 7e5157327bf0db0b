/// Profile endpoints (authenticated)
///
/// - `GET /profile` - The caller's user document, without the password hash
/// - `PUT /editprofile/username` - Rename the caller
/// - `PUT /editprofile/password` - Change the caller's password
///
/// Renaming does not reissue a token. Tokens carrying the old username stop
/// resolving to a user.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::AppJson,
    routes::MessageResponse,
};
use axum::{extract::State, Json};
use serde::Deserialize;
use taskmanager_shared::{
    auth::{middleware::AuthContext, password},
    models::user::User,
    store::StoreError,
};
use validator::Validate;

const USER_NOT_FOUND: &str = "cannot find the user";
const USERNAME_TAKEN: &str = "username already exists";

fn user_not_found() -> ApiError {
    ApiError::BadRequest(USER_NOT_FOUND.to_string())
}

/// Rename request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct EditUsernameRequest {
    #[validate(length(min = 1, message = "newUsername is required"))]
    pub new_username: String,
}

/// Password change request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct EditPasswordRequest {
    /// New password
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,

    /// Current password
    #[validate(length(min = 1, message = "pass is required"))]
    pub pass: String,
}

pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<User>> {
    let user = state
        .store
        .find_by_username(&auth.username)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(user))
}

/// Rename the caller
///
/// # Errors
///
/// - `400 Bad Request`: caller no longer exists
/// - `401 Unauthorized`: `{"err":"username already exists"}`
pub async fn edit_username(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(req): AppJson<EditUsernameRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    if state.store.find_by_username(&auth.username).await?.is_none() {
        return Err(user_not_found());
    }

    if state.store.find_by_username(&req.new_username).await?.is_some() {
        return Err(ApiError::Unauthorized(USERNAME_TAKEN.to_string()));
    }

    state
        .store
        .rename_user(&auth.username, &req.new_username)
        .await
        .map_err(|e| match e {
            StoreError::DuplicateUsername(_) => ApiError::Unauthorized(USERNAME_TAKEN.to_string()),
            StoreError::UserNotFound(_) => user_not_found(),
            other => other.into(),
        })?;

    tracing::info!(
        username = %auth.username,
        new_username = %req.new_username,
        "Username changed"
    );

    Ok(Json(MessageResponse::new("successfully updated")))
}

/// Change the caller's password
///
/// # Errors
///
/// - `400 Bad Request`: caller no longer exists, or
///   `{"msg":"Incorrect previous password"}`
pub async fn edit_password(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(req): AppJson<EditPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    let user = state
        .store
        .find_by_username(&auth.username)
        .await?
        .ok_or_else(user_not_found)?;

    if !password::verify_in_background(req.pass, user.password_hash).await? {
        tracing::info!(username = %auth.username, "Password change rejected");
        return Err(ApiError::Refused("Incorrect previous password".to_string()));
    }

    let new_hash = password::hash_in_background(req.password).await?;
    state
        .store
        .set_password_hash(&auth.username, &new_hash)
        .await
        .map_err(|e| match e {
            StoreError::UserNotFound(_) => user_not_found(),
            other => other.into(),
        })?;

    tracing::info!(username = %auth.username, "Password changed");

    Ok(Json(MessageResponse::new("Password changed successfully")))
}
