// Route path constants - single source of truth for all API paths

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

pub const HEALTH: &str = "/health";
pub const EMPLOYEES: &str = "/employees";
pub const EMPLOYEE_ITEM: &str = "/employees/{id}";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Route table: (method, path) -> handler
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH, get(handlers::health_handler))
        .route(
            EMPLOYEES,
            get(handlers::list_handler).post(handlers::create_handler),
        )
        .route(
            EMPLOYEE_ITEM,
            get(handlers::get_handler)
                .put(handlers::replace_handler)
                .delete(handlers::delete_handler),
        )
        .merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
