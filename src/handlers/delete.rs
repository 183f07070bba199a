use crate::error::{ApiError, ErrorResponse};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::rejection::PathRejection, extract::Path, extract::State, http::StatusCode,
};

/// DELETE /api/todos/{id} handler - Remove a todo
///
/// Answers 204 with an empty body whether or not the id existed.
#[utoipa::path(
    delete,
    path = routes::TODO_ITEM,
    params(
        ("id" = String, Path, description = "Todo id")
    ),
    responses(
        (status = 204, description = "Todo deleted (or never existed)"),
        (status = 400, description = "Undecodable id", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;

    state.todos.delete(&id).await?;

    tracing::info!("Deleted todo with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{app_with, send};
    use crate::store::testing::FailingStore;
    use crate::store::MemoryStore;
    use axum::http::StatusCode;
    use serde_json::{json, Value as JsonValue};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_delete_endpoint_success() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (_, created) = send(&app, "POST", "/api/todos", Some(json!({"title": "Buy milk"}))).await;
        let id = created["id"].as_str().unwrap();

        let (status, body) = send(&app, "DELETE", &format!("/api/todos/{}", id), None).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, JsonValue::Null);

        let (_, listed) = send(&app, "GET", "/api/todos", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn test_delete_endpoint_unknown_id() {
        let app = app_with(Arc::new(MemoryStore::new()));

        let (status, _) = send(&app, "DELETE", "/api/todos/never-existed", None).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_delete_endpoint_store_error() {
        let app = app_with(Arc::new(FailingStore));

        let (status, body) = send(&app, "DELETE", "/api/todos/1", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "store unavailable");
    }

    #[tokio::test]
    async fn test_delete_endpoint_undecodable_id() {
        let app = app_with(Arc::new(MemoryStore::new()));

        let (status, body) = send(&app, "DELETE", "/api/todos/%FF", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid path"));
    }
}
