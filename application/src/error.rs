use std::io;
use thiserror::Error;

use domain::error::DomainError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Insufficient credits: {message}")]
    InsufficientCredits { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("External service error: {message}")]
    ExternalServiceError { message: String },

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("Cache error: {message}")]
    CacheError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AppError {
    /// Transient failures are worth retrying and downgrade to the
    /// fallback dataset; everything else is a hard failure that must
    /// revert the reservation.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ExternalServiceError { .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;
