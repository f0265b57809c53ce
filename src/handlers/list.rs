use crate::error::{ApiError, ErrorResponse};
use crate::models::Employee;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /employees handler - List all employees
#[utoipa::path(
    get,
    path = routes::EMPLOYEES,
    responses(
        (status = 200, description = "All employees, ordered by id", body = Vec<Employee>),
        (status = 500, description = "Repository error", body = ErrorResponse)
    ),
    tag = "employees"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<Employee>>), ApiError> {
    let employees = state.repository.find_all().await?;

    tracing::info!("Listed {} employees", employees.len());
    Ok((StatusCode::OK, Json(employees)))
}
