use thiserror::Error;

#[derive(Error, Debug)]
pub enum DentalError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Outside clinic hours: {0}")]
    OutOfHours(String),

    #[error("Scheduling conflict: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl DentalError {
    /// Whether the caller can fix the request and try again.
    pub fn is_user_correctable(&self) -> bool {
        !matches!(self, DentalError::Database(_) | DentalError::Internal(_))
    }
}

pub type DentalResult<T> = Result<T, DentalError>;
