use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for ledger operations over transactions and transfers
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("No account named '{0}' exists")]
    AccountNotFound(String),
    #[error("No category named '{0}' exists")]
    CategoryNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Source and destination account are both '{0}'")]
    SameAccountTransfer(String),
    #[error("Currency mismatch between source ({src}) and destination ({destination})")]
    CurrencyMismatch { src: String, destination: String },
}

impl From<DieselError> for LedgerError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => LedgerError::NotFound("Record not found".to_string()),
            _ => LedgerError::DatabaseError(err.to_string()),
        }
    }
}
