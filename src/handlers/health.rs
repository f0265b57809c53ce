use crate::error::{HealthResponse, UnhealthyResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /health handler - Health check endpoint
///
/// Asks the repository to reach its backing store.
/// Returns 200 OK if it is reachable, 503 Service Unavailable otherwise.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = UnhealthyResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<HealthResponse>), (StatusCode, Json<UnhealthyResponse>)> {
    match state.repository.health_check().await {
        Ok(_) => {
            tracing::debug!("Health check passed");
            Ok((
                StatusCode::OK,
                Json(HealthResponse {
                    status: "healthy".to_string(),
                }),
            ))
        }
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(UnhealthyResponse {
                    status: "unhealthy".to_string(),
                    error: format!("Cannot reach storage: {}", e),
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{send, setup_failing_app, setup_test_app};

    #[tokio::test]
    async fn test_health_endpoint_healthy() {
        let (app, _) = setup_test_app();

        let response = send(&app, "GET", "/health", None).await;

        assert_eq!(response.status, StatusCode::OK);
        let response_json: HealthResponse = response.json();
        assert_eq!(response_json.status, "healthy");
    }

    #[tokio::test]
    async fn test_health_endpoint_unhealthy() {
        let app = setup_failing_app();

        let response = send(&app, "GET", "/health", None).await;

        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        let response_json: UnhealthyResponse = response.json();
        assert_eq!(response_json.status, "unhealthy");
        assert!(response_json.error.contains("Cannot reach storage"));
    }
}
