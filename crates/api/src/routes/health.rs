//! Liveness and readiness probes. Unauthenticated.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::AppState;

/// Probe response body.
#[derive(Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded".
    pub status: &'static str,
    /// Crate name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
}

/// GET /health - Pings the database and reports service status.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(err) => {
            tracing::warn!(error = %err, "Health check database ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Creates the health router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
