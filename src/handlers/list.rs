use crate::error::{ApiError, ErrorResponse};
use crate::models::TodoItem;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /api/todos handler - List every todo
///
/// Returns all stored items unfiltered, in whatever order the store yields them.
#[utoipa::path(
    get,
    path = routes::TODOS,
    responses(
        (status = 200, description = "All todo items", body = [TodoItem]),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<TodoItem>>), ApiError> {
    let items = state.todos.list().await?;

    tracing::info!("Listed {} todos", items.len());
    Ok((StatusCode::OK, Json(items)))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{app_with, send};
    use crate::models::TodoItem;
    use crate::store::testing::FailingStore;
    use crate::store::{MemoryStore, TodoStore};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_endpoint_empty() {
        let app = app_with(Arc::new(MemoryStore::new()));

        let (status, body) = send(&app, "GET", "/api/todos", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_list_endpoint_with_items() {
        let store = MemoryStore::new();
        for (id, title, done) in [("1", "Test Task 1", false), ("2", "Test Task 2", true)] {
            store
                .put(&TodoItem {
                    id: id.to_string(),
                    title: Some(title.to_string()),
                    done: Some(done),
                })
                .await
                .unwrap();
        }
        let app = app_with(Arc::new(store));

        let (status, body) = send(&app, "GET", "/api/todos", None).await;

        assert_eq!(status, StatusCode::OK);
        let items: Vec<TodoItem> = serde_json::from_value(body).unwrap();
        assert_eq!(items.len(), 2);
        let second = items.iter().find(|item| item.id == "2").unwrap();
        assert_eq!(second.title.as_deref(), Some("Test Task 2"));
        assert_eq!(second.done, Some(true));
    }

    #[tokio::test]
    async fn test_list_endpoint_shows_cleared_fields_as_null() {
        let store = MemoryStore::new();
        store.update("1", None, None).await.unwrap();
        let app = app_with(Arc::new(store));

        let (status, body) = send(&app, "GET", "/api/todos", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"id": "1", "title": null, "done": null}]));
    }

    #[tokio::test]
    async fn test_list_endpoint_store_error() {
        let app = app_with(Arc::new(FailingStore));

        let (status, body) = send(&app, "GET", "/api/todos", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "store unavailable");
    }
}
