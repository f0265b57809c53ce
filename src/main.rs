mod api_doc;
mod config;
mod error;
mod handlers;
mod location;
mod models;
mod repository;
mod routes;
mod state;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use config::Config;
use state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("employee_service=info,tower_http=info")),
        )
        .init();

    tracing::info!("employee-service starting");

    let config = Config::from_env()?;
    config.log_startup();

    let repository = repository::from_config(&config).await?;
    let app = routes::router(AppState::new(repository));

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;

    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("employee-service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
