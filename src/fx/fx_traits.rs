use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::fx_model::{ExchangeRate, NewExchangeRate, ValuationLine};
use crate::errors::Result;

/// Trait defining the contract for the pivot-relative rate store.
#[async_trait]
pub trait RateStoreTrait: Send + Sync {
    /// Upserts the pivot->quote rate for a day. At most one stored rate per
    /// (quote currency, date).
    async fn set_rate(&self, new_rate: NewExchangeRate) -> Result<ExchangeRate>;

    /// Most recent stored pivot->quote rate at or earlier than `date`. Never
    /// scans forward.
    fn get_rate_on_or_before(&self, quote: &str, date: NaiveDate) -> Result<Option<ExchangeRate>>;

    /// Whether a base/quote rate is derivable through the pivot on or before
    /// `date`.
    fn has_rate(&self, base: &str, quote: &str, date: NaiveDate) -> Result<bool>;

    fn get_rates_for(&self, quote: &str) -> Result<Vec<ExchangeRate>>;
}

/// Trait defining the contract for FX service operations.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Stores a pivot rate directly, bypassing the provider gateway.
    async fn set_manual_eur_pivot(
        &self,
        quote_currency: &str,
        date: NaiveDate,
        rate: Decimal,
    ) -> Result<ExchangeRate>;

    /// Fetches and stores the daily snapshot for `date` when any of the given
    /// currencies has no rate on or before that day.
    async fn ensure_rates_for(&self, date: NaiveDate, currencies: &[String]) -> Result<()>;

    fn rate_for_date(&self, base: &str, quote: &str, date: NaiveDate) -> Result<Decimal>;

    fn convert_for_date(
        &self,
        amount: Decimal,
        base: &str,
        quote: &str,
        date: NaiveDate,
    ) -> Result<Decimal>;

    fn calculate_total(&self, lines: &[ValuationLine], target_currency: &str) -> Result<Decimal>;

    fn has_all_rates_for_totals(
        &self,
        lines: &[ValuationLine],
        target_currency: &str,
    ) -> Result<bool>;
}
