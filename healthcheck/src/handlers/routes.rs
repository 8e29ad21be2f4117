//! HTTP routes for the health surface

use crate::{
    handlers::health::{handle_health, handle_liveness},
    AppState,
};
use axum::{routing::get, Router};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handle_health))
        .route("/live", get(handle_liveness))
}
