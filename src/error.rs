use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// `EmployeeNotFound` maps to a bare 404 with no body. Every other variant
/// is rendered as an `ErrorResponse` JSON document.
#[derive(Debug)]
pub enum ApiError {
    /// No employee stored under this id
    EmployeeNotFound(i64),
    /// Path segment is not a valid employee id
    InvalidId(String),
    /// Repository operation error
    Repository(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::EmployeeNotFound(id) => {
                tracing::info!("Could not find employee {}", id);
                return StatusCode::NOT_FOUND.into_response();
            }
            ApiError::InvalidId(id) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid employee id: expected an integer, got '{}'", id),
            ),
            ApiError::Repository(err) => {
                tracing::error!("Repository error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Repository error: {}", err),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Repository(err)
    }
}

/// Parse an `{id}` path segment
pub fn parse_id(id_str: &str) -> Result<i64, ApiError> {
    id_str
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidId(id_str.to_string()))
}
