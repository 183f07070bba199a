use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A todo item as stored and returned by the API
///
/// `title` and `done` are always set on creation. A replacing update may
/// clear either of them, in which case they are listed as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TodoItem {
    pub id: String,
    pub title: Option<String>,
    pub done: Option<bool>,
}

impl TodoItem {
    /// New, not yet completed item with a freshly generated id
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: Some(title),
            done: Some(false),
        }
    }
}

/// Request body for POST /api/todos
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
}

/// Request body for PUT /api/todos/{id}
///
/// Both fields replace the stored values; a missing field clears it.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub done: Option<bool>,
}

/// Plain `{"status": ...}` acknowledgement body
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}
