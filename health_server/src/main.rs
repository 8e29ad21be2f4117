//! Main entry point for the health-check server binary

use anyhow::Result;
use healthcheck::{
    create_app, get_database_pool, run_server, AppConfig, AppError, AppState, CheckContext, Checks,
    FnChecker, SqlChecker,
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());
    info!("Database URL: {}", config.database.url);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let pool = get_database_pool(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create database pool: {}", e))?;

    let mut ctx = CheckContext::new();
    if let Some(limit) = config.health.check_timeout() {
        ctx = ctx.with_limit(limit);
    }

    let mut checks = Checks::new(ctx.clone())
        .with_policy(config.health.policy)
        .with_logger(|args| tracing::error!("{}", args))
        .add_check(SqlChecker::new(pool.clone(), "primary").with_depth(config.health.check_depth));

    if let Some(path) = config.database.file_path() {
        checks = checks.add_check(FnChecker::new("database-file", move || {
            if path.exists() {
                Ok(())
            } else {
                Err(AppError::Unhealthy(format!(
                    "database file {} is missing",
                    path.display()
                )))
            }
        }));
    }

    info!(
        "Registered {} health checks (policy: {:?}, depth: {:?})",
        checks.len(),
        config.health.policy,
        config.health.check_depth
    );

    let state = AppState::new(checks);
    let app = create_app(state);

    run_server(app, addr, ctx).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default_level = if cfg!(debug_assertions) {
            "debug"
        } else {
            "info"
        };

        format!(
            "{}={},tower_http=debug,axum=debug",
            env!("CARGO_CRATE_NAME").replace('-', "_"),
            default_level
        )
        .into()
    });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
