/// Task list endpoints (authenticated)
///
/// Every handler acts on the task list of the user named in the caller's
/// token. Each mutation is one store operation.
///
/// # Endpoints
///
/// - `GET /tasks` - The caller's tasks, in list order
/// - `POST /tasks` - Append a task; the id must be new
/// - `PUT /tasks/:id` - Replace the task with this id (appends if absent)
/// - `DELETE /tasks/:id` - Remove every task with this id

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::AppJson,
    routes::MessageResponse,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use taskmanager_shared::{
    auth::middleware::AuthContext,
    models::task::{Task, TaskFields},
    store::StoreError,
};
use validator::Validate;

/// Task mutations word the missing-owner error differently from reads
fn map_store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::UserNotFound(_) => ApiError::BadRequest("cannot find user".to_string()),
        other => other.into(),
    }
}

/// New task body: an id plus the task fields
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, message = "id is required"))]
    pub id: String,

    #[serde(flatten)]
    pub fields: TaskFields,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Task>>> {
    // Listing reports a missing owner as "cannot find the user"
    let tasks = state.store.list_tasks(&auth.username).await?;

    Ok(Json(tasks))
}

/// Append a task
///
/// # Errors
///
/// - `400 Bad Request`: missing id, or the caller no longer exists
/// - `409 Conflict`: the caller already has a task with this id
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(req): AppJson<CreateTaskRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    let task = Task::new(req.id, req.fields);
    let task_id = task.id.clone();

    state
        .store
        .add_task(&auth.username, task)
        .await
        .map_err(map_store_error)?;

    tracing::debug!(username = %auth.username, task_id = %task_id, "Task added");

    Ok(Json(MessageResponse::new("successfully added")))
}

/// Replace a task by id
///
/// The path id wins over any `id` in the body.
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    AppJson(fields): AppJson<TaskFields>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .store
        .replace_task(&auth.username, Task::new(id.clone(), fields))
        .await
        .map_err(map_store_error)?;

    tracing::debug!(username = %auth.username, task_id = %id, "Task replaced");

    Ok(Json(MessageResponse::new("Status successfully updated")))
}

pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .store
        .remove_task(&auth.username, &id)
        .await
        .map_err(map_store_error)?;

    tracing::debug!(username = %auth.username, task_id = %id, "Task removed");

    Ok(Json(MessageResponse::new("successfully deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_splits_id_from_fields() {
        let req: CreateTaskRequest = serde_json::from_value(json!({
            "id": "t-1",
            "taskName": "Write report",
            "priority": 3
        }))
        .unwrap();

        assert_eq!(req.id, "t-1");
        assert_eq!(req.fields.task_name, json!("Write report"));
        assert_eq!(req.fields.priority, json!(3));
        assert!(req.fields.status.is_null());
    }

    #[test]
    fn test_create_request_requires_id() {
        let req: CreateTaskRequest = serde_json::from_value(json!({ "taskName": "x" })).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_missing_owner_wording() {
        let err = map_store_error(StoreError::UserNotFound("al".to_string()));
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "cannot find user"));

        let err = ApiError::from(StoreError::UserNotFound("al".to_string()));
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "cannot find the user"));
    }
}
