/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Greeting and health check
/// - `auth`: Signup and login
/// - `profile`: Profile read and edits
/// - `tasks`: Task list CRUD

pub mod auth;
pub mod health;
pub mod profile;
pub mod tasks;

use serde::{Deserialize, Serialize};

/// Plain acknowledgement body, `{"msg": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}
