use thiserror::Error;

/// Centralized error types for the application
///
/// Storage, Telegram and configuration failures are converted into this enum
/// so handlers can log them uniformly and fall back to a user-facing reply.
///
/// # Example
///
/// ```no_run
/// use jobboard::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     log::error!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Configuration could not be loaded or is incomplete
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema migrations could not be applied
    #[error("Migration error: {0}")]
    Migration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// (De)serialization of stored markup or API payloads
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An identifier (job, subscription, client, ...) did not resolve
    #[error("{0}")]
    NotFound(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl AppError {
    /// True when the error means "no such row" rather than a broken store.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::NotFound(_) | AppError::Database(rusqlite::Error::QueryReturnedNoRows)
        )
    }
}
