use crate::error::{parse_id, ApiError, ErrorResponse};
use crate::location::BaseUri;
use crate::models::{Employee, EmployeeRequest};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};

/// PUT /employees/:id handler - Replace or create an employee
///
/// An existing employee has its name and role overwritten (200). An absent
/// one is created under the path id (201). Either way the response carries
/// `Content-Location` with the employee's absolute URI.
#[utoipa::path(
    put,
    path = routes::EMPLOYEE_ITEM,
    params(
        ("id" = i64, Path, description = "Employee id")
    ),
    request_body = EmployeeRequest,
    responses(
        (status = 200, description = "Existing employee updated", body = Employee),
        (status = 201, description = "Employee created under the given id", body = Employee),
        (status = 400, description = "Invalid employee id or invalid JSON", body = ErrorResponse),
        (status = 500, description = "Repository error", body = ErrorResponse)
    ),
    tag = "employees"
)]
pub async fn replace_handler(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    base: BaseUri,
    Json(request): Json<EmployeeRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Employee>), ApiError> {
    let id = parse_id(&id_str)?;

    let (status, employee) = match state.repository.find_by_id(id).await? {
        Some(mut existing) => {
            existing.name = request.name;
            existing.role = request.role;
            (StatusCode::OK, state.repository.save(existing).await?)
        }
        None => {
            let created = Employee::from(request).with_id(id);
            (StatusCode::CREATED, state.repository.save(created).await?)
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_LOCATION, base.employee_header(id));

    tracing::info!("Replaced employee with id: {} ({})", id, status);
    Ok((status, headers, Json(employee)))
}
