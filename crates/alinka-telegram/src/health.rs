//! Health endpoint for hosting platforms that expect a bound port.

use alinka_core::prompts::HEALTH_TEXT;
use axum::{routing::get, Router};
use tracing::info;

/// GET / - static liveness text.
pub async fn home() -> &'static str {
    HEALTH_TEXT
}

/// Creates the health router.
pub fn create_router() -> Router {
    Router::new().route("/", get(home))
}

/// Binds `0.0.0.0:port` and serves the health router until the process exits.
pub async fn serve(port: u16) -> Result<(), std::io::Error> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Health server listening on {}", addr);
    axum::serve(listener, create_router()).await
}
