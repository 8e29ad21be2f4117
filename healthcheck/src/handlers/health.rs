//! Health check handlers: translate a verdict into an HTTP exchange

use crate::{health::Verdict, AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::{info, warn};

/// Body returned when every checker passes.
pub const HEALTHY_BODY: &str = "OK";

/// Body returned when any checker fails. Intentionally fixed: per-checker
/// detail goes to the diagnostic sink, never to the caller.
pub const UNHEALTHY_BODY: &str = "Everything is on fire and nothing is okay.";

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /health - running health checks");

    match state.checks.run().await {
        Verdict::Healthy => (StatusCode::OK, HEALTHY_BODY),
        Verdict::Unhealthy(failures) => {
            warn!(failed = failures.len(), "health check pass failed");
            (StatusCode::INTERNAL_SERVER_ERROR, UNHEALTHY_BODY)
        }
    }
}

pub async fn handle_liveness() -> impl IntoResponse {
    info!("GET /live - liveness probe");

    (StatusCode::OK, "alive")
}
