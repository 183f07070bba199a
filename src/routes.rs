use axum::{
    routing::{get, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/api/health";
pub const TODOS: &str = "/api/todos";
pub const TODO_ITEM: &str = "/api/todos/{id}";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI: &str = "/swagger-ui";

/// Build the full application router
///
/// Every route, the OpenAPI UI included, allows requests from any origin.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(HEALTH, get(handlers::health_handler))
        .route(
            TODOS,
            get(handlers::list_handler).post(handlers::create_handler),
        )
        .route(
            TODO_ITEM,
            put(handlers::update_handler).delete(handlers::delete_handler),
        )
        .merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
