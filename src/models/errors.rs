use thiserror::Error;
use uuid::Uuid;

/// Service-level errors that can occur in business logic
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Order not found: {id}")]
    OrderNotFound { id: Uuid },

    #[error("Order table not found: {id}")]
    TableNotFound { id: Uuid },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Repository error: {source}")]
    Repository {
        #[from]
        source: RepositoryError,
    },
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::ValidationError {
            message: message.into(),
        }
    }
}

/// Repository-level errors for data access operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database connection failed")]
    ConnectionFailed,

    #[error("Row not found")]
    NotFound,

    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                RepositoryError::ConnectionFailed
            }
            sqlx::Error::Database(db_err) if db_err.constraint().is_some() => {
                RepositoryError::ConstraintViolation {
                    message: db_err.to_string(),
                }
            }
            other => RepositoryError::Database {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;
