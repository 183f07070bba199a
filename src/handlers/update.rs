use crate::error::{ApiError, ErrorResponse};
use crate::models::{StatusResponse, UpdateTodoRequest};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::Path,
    extract::State,
    http::StatusCode,
    Json,
};

/// PUT /api/todos/{id} handler - Replace a todo's title and done flag
///
/// Fields missing from the body are written as null. The id is not checked
/// for existence first; updating an unknown id creates a record with just the
/// supplied fields.
#[utoipa::path(
    put,
    path = routes::TODO_ITEM,
    params(
        ("id" = String, Path, description = "Todo id")
    ),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = StatusResponse),
        (status = 400, description = "Invalid JSON or undecodable id", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StatusResponse>), ApiError> {
    let Path(id) = path?;
    let Json(request) = payload?;

    state.todos.update(&id, request).await?;

    tracing::info!("Updated todo with id: {}", id);
    Ok((StatusCode::OK, Json(StatusResponse::new("updated"))))
}
