use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{Employee, EmployeeRequest};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "employee-service API",
        version = "1.0.0",
        description = "A REST CRUD service for employee records"
    ),
    paths(
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::create::create_handler,
        handlers::get::get_handler,
        handlers::replace::replace_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            Employee,
            EmployeeRequest,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "employees", description = "Employee resource operations")
    )
)]
pub struct ApiDoc;
