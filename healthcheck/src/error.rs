//! Application error types and handling

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("check cancelled")]
    Cancelled,

    #[error("check timed out")]
    Timeout,

    #[error("unhealthy: {0}")]
    Unhealthy(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                AppError::Unhealthy("probe query returned no rows".to_string())
            }
            sqlx::Error::PoolTimedOut => AppError::Timeout,
            _ => AppError::Database(err.to_string()),
        }
    }
}
