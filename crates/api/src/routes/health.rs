//! Liveness endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    /// Whether the database ping succeeded.
    pub database: bool,
    /// Service version.
    pub version: &'static str,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.db.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            false
        }
    };

    Json(HealthResponse {
        status: if database { "healthy" } else { "degraded" },
        database,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
