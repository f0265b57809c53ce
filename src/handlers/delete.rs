use crate::error::{parse_id, ApiError, ErrorResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode};

/// DELETE /employees/:id handler - Remove an employee
#[utoipa::path(
    delete,
    path = routes::EMPLOYEE_ITEM,
    params(
        ("id" = i64, Path, description = "Employee id")
    ),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 400, description = "Invalid employee id", body = ErrorResponse),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Repository error", body = ErrorResponse)
    ),
    tag = "employees"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id_str)?;

    if state.repository.find_by_id(id).await?.is_none() {
        return Err(ApiError::EmployeeNotFound(id));
    }

    state.repository.delete_by_id(id).await?;

    tracing::info!("Deleted employee with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
