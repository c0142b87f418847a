use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for debt-related operations
#[derive(Debug, Error)]
pub enum DebtError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid parent transaction: {0}")]
    InvalidParent(String),
}

impl From<DieselError> for DebtError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => DebtError::NotFound("Record not found".to_string()),
            _ => DebtError::DatabaseError(err.to_string()),
        }
    }
}
