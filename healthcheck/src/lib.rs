//! Core library for health-check aggregation: a polymorphic checker
//! contract, an aggregator producing one consolidated verdict per pass, and
//! the HTTP surface exposing it.

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;

pub use crate::config::{AppConfig, DatabaseConfig, HealthConfig, ServerConfig};
pub use database::get_database_pool;
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use health::{
    CheckContext, CheckDepth, CheckFailure, Checker, Checks, FailurePolicy, FnChecker, SqlChecker,
    Verdict,
};

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub checks: Arc<Checks>,
}

impl AppState {
    pub fn new(checks: Checks) -> Self {
        Self {
            checks: Arc::new(checks),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(middleware::logging::logging_layer())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr, ctx: CheckContext) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Abort in-flight probes before the listener drains.
            ctx.cancel();
        })
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
