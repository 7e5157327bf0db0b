/// Task records embedded in a user document
///
/// A task is identified by a caller-supplied string id. The remaining fields
/// are opaque JSON values: the server stores and returns whatever the client
/// sent, and an absent field is kept as `null`.
///
/// # Wire format
///
/// ```json
/// {
///   "id": "t-1",
///   "taskName": "Write report",
///   "description": "Quarterly numbers",
///   "dueDate": "2024-05-01",
///   "status": "open",
///   "priority": "high"
/// }
/// ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything about a task except its id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    #[serde(default)]
    pub task_name: Value,

    #[serde(default)]
    pub description: Value,

    #[serde(default)]
    pub due_date: Value,

    #[serde(default)]
    pub status: Value,

    #[serde(default)]
    pub priority: Value,
}

/// A task in a user's task list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Caller-supplied identifier, unique within one user's list
    pub id: String,

    #[serde(flatten)]
    pub fields: TaskFields,
}

impl Task {
    pub fn new(id: impl Into<String>, fields: TaskFields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}
