use diesel::result::Error as DieselError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FxError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("No exchange rate derivable for {base}/{quote} on or before {date}")]
    ConversionUnavailable {
        base: String,
        quote: String,
        date: chrono::NaiveDate,
    },

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl From<DieselError> for FxError {
    fn from(err: DieselError) -> Self {
        FxError::DatabaseError(err.to_string())
    }
}
