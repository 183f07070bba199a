use crate::error::{ApiError, ErrorResponse};
use crate::models::{CreateTodoRequest, TodoItem};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::rejection::JsonRejection, extract::State, http::StatusCode, Json,
};

/// POST /api/todos handler - Create a todo
///
/// The id is generated server-side and the item starts out not done. Any
/// string, the empty one included, is accepted as a title.
#[utoipa::path(
    post,
    path = routes::TODOS,
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoItem),
        (status = 400, description = "Invalid JSON or missing title", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoItem>), ApiError> {
    let Json(request) = payload?;

    let item = state.todos.create(request).await?;

    tracing::info!("Created todo with id: {}", item.id);
    Ok((StatusCode::CREATED, Json(item)))
}
