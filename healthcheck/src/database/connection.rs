use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::time::Duration;
use tracing::{error, info};

/// Builds the shared connection pool the service (and its datastore
/// checker) will borrow. The pool is owned by the caller; health checkers
/// only hold clone handles to it.
pub async fn get_database_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    info!("Connecting to database: {}", config.url);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .test_before_acquire(true)
        .connect(&config.url)
        .await
        .map_err(|e| {
            error!("Failed to create database pool: {}", e);
            AppError::from(e)
        })?;

    info!("Database connection pool created successfully");
    Ok(pool)
}
