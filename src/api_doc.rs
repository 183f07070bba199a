use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use crate::models::{CreateTodoRequest, StatusResponse, TodoItem, UpdateTodoRequest};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "spanner-todo-api",
        version = "1.0.0",
        description = "A minimal todo list API backed by Google Cloud Spanner"
    ),
    paths(
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::create::create_handler,
        handlers::update::update_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            TodoItem,
            CreateTodoRequest,
            UpdateTodoRequest,
            StatusResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "health", description = "Liveness check"),
        (name = "todos", description = "Todo list operations")
    )
)]
pub struct ApiDoc;
