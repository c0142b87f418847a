use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::PIVOT_CURRENCY;
use crate::errors::Result;
use crate::fx::fx_errors::FxError;
use crate::utils::{format_date, now_string, parse_date, parse_decimal};

/// A stored pivot-relative exchange rate: one unit of the pivot currency in
/// terms of `quote_currency`, valid for `rate_date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub id: String,
    pub quote_currency: String,
    pub rate_date: NaiveDate,
    pub rate: Decimal,
}

impl ExchangeRate {
    pub fn make_rate_id(quote_currency: &str, date: NaiveDate) -> String {
        format!(
            "{}{}={}",
            PIVOT_CURRENCY,
            quote_currency,
            format_date(date)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExchangeRate {
    pub quote_currency: String,
    pub rate_date: NaiveDate,
    pub rate: Decimal,
}

impl NewExchangeRate {
    pub fn validate(&self) -> Result<()> {
        if self.quote_currency.len() != 3
            || !self.quote_currency.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(FxError::InvalidCurrencyCode(self.quote_currency.clone()).into());
        }
        if self.quote_currency.eq_ignore_ascii_case(PIVOT_CURRENCY) {
            return Err(FxError::InvalidRate(format!(
                "Refusing to store a {}/{} self rate",
                PIVOT_CURRENCY, PIVOT_CURRENCY
            ))
            .into());
        }
        if self.rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(format!(
                "Rate for {} must be positive, got {}",
                self.quote_currency, self.rate
            ))
            .into());
        }
        Ok(())
    }
}

/// A transaction's view for total computation: native amount plus the
/// optional valuation snapshot recorded at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationLine {
    pub amount: Decimal,
    pub currency: String,
    pub date: NaiveDate,
    pub snapshot_currency: Option<String>,
    pub snapshot_amount: Option<Decimal>,
}

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::exchange_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExchangeRateDB {
    pub id: String,
    pub quote_currency: String,
    pub rate_date: String,
    pub rate: String,
    pub created_at: String,
}

impl From<ExchangeRateDB> for ExchangeRate {
    fn from(db: ExchangeRateDB) -> Self {
        Self {
            rate_date: parse_date(&db.rate_date, "rate_date"),
            rate: parse_decimal(&db.rate, "rate"),
            id: db.id,
            quote_currency: db.quote_currency,
        }
    }
}

impl From<NewExchangeRate> for ExchangeRateDB {
    fn from(domain: NewExchangeRate) -> Self {
        // Codes are stored uppercase; lookups normalize the same way.
        let quote_currency = domain.quote_currency.to_ascii_uppercase();
        Self {
            id: ExchangeRate::make_rate_id(&quote_currency, domain.rate_date),
            quote_currency,
            rate_date: format_date(domain.rate_date),
            rate: domain.rate.to_string(),
            created_at: now_string(),
        }
    }
}
