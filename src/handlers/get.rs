use crate::error::{parse_id, ApiError, ErrorResponse};
use crate::models::Employee;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, extract::Path, http::StatusCode, Json};

/// GET /employees/:id handler - Retrieve one employee
#[utoipa::path(
    get,
    path = routes::EMPLOYEE_ITEM,
    params(
        ("id" = i64, Path, description = "Employee id")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 400, description = "Invalid employee id", body = ErrorResponse),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Repository error", body = ErrorResponse)
    ),
    tag = "employees"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let id = parse_id(&id_str)?;

    match state.repository.find_by_id(id).await? {
        Some(employee) => {
            tracing::info!("Successfully retrieved employee with id: {}", id);
            Ok((StatusCode::OK, Json(employee)))
        }
        None => Err(ApiError::EmployeeNotFound(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{send, setup_test_app};

    #[tokio::test]
    async fn test_get_is_safe_and_idempotent() {
        let (app, repo) = setup_test_app();
        repo.seed(Employee::new("Mary", "Manager")).await;

        let first = send(&app, "GET", "/employees/1", None).await;
        assert_eq!(first.status, StatusCode::OK);
        assert_eq!(first.header("content-type"), Some("application/json"));
        assert_eq!(
            first.json::<Employee>(),
            Employee::new("Mary", "Manager").with_id(1)
        );

        let second = send(&app, "GET", "/employees/1", None).await;
        assert_eq!(second.status, StatusCode::OK);
        assert_eq!(second.body, first.body);

        let missing = send(&app, "GET", "/employees/2", None).await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert!(missing.body.is_empty());

        assert_eq!(repo.find_by_id_count(), 3);
        assert_eq!(repo.save_count(), 0);
        assert_eq!(repo.delete_count(), 0);
    }

    #[tokio::test]
    async fn test_get_invalid_id() {
        let (app, repo) = setup_test_app();

        let response = send(&app, "GET", "/employees/not-a-number", None).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert!(error.error.contains("Invalid employee id"));
        assert_eq!(repo.find_by_id_count(), 0);
    }
}
