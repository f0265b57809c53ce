use crate::error::{ApiError, ErrorResponse};
use crate::location::BaseUri;
use crate::models::{Employee, EmployeeRequest};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};

/// POST /employees handler - Create an employee
///
/// Not idempotent: every call stores a new employee under a fresh id.
#[utoipa::path(
    post,
    path = routes::EMPLOYEES,
    request_body = EmployeeRequest,
    responses(
        (status = 201, description = "Employee created; Location points at it", body = Employee),
        (status = 400, description = "Invalid JSON"),
        (status = 500, description = "Repository error", body = ErrorResponse)
    ),
    tag = "employees"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    base: BaseUri,
    Json(request): Json<EmployeeRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Employee>), ApiError> {
    let employee = state.repository.save(Employee::from(request)).await?;
    let id = employee
        .id
        .ok_or_else(|| anyhow::anyhow!("Repository did not assign an employee id"))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, base.employee_header(id));

    tracing::info!("Created employee with id: {}", id);
    Ok((StatusCode::CREATED, headers, Json(employee)))
}
