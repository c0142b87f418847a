use diesel::prelude::*;
use std::sync::Arc;

use crate::constants::PIVOT_CURRENCY;
use crate::db::{get_connection, DbPool, DbTransactionExecutor};
use crate::errors::Result;
use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::{ExchangeRate, ExchangeRateDB, NewExchangeRate};
use crate::fx::fx_traits::RateStoreTrait;
use crate::schema::exchange_rates;
use crate::utils::format_date;

/// Persistent store of pivot-relative daily exchange rates. Conversion math
/// lives in the valuation engine; this type only answers point and range
/// queries over stored rows.
pub struct RateStore {
    pool: Arc<DbPool>,
}

impl RateStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn pivot_leg_exists(&self, quote: &str, date: chrono::NaiveDate) -> Result<bool> {
        Ok(self.get_rate_on_or_before(quote, date)?.is_some())
    }
}

#[async_trait::async_trait]
impl RateStoreTrait for RateStore {
    async fn set_rate(&self, new_rate: NewExchangeRate) -> Result<ExchangeRate> {
        new_rate.validate()?;

        self.pool.execute(|conn| -> Result<ExchangeRate> {
            let row: ExchangeRateDB = new_rate.into();

            diesel::insert_into(exchange_rates::table)
                .values(&row)
                .on_conflict((exchange_rates::quote_currency, exchange_rates::rate_date))
                .do_update()
                .set(exchange_rates::rate.eq(&row.rate))
                .execute(conn)
                .map_err(FxError::from)?;

            let stored = exchange_rates::table
                .filter(exchange_rates::quote_currency.eq(&row.quote_currency))
                .filter(exchange_rates::rate_date.eq(&row.rate_date))
                .first::<ExchangeRateDB>(conn)
                .map_err(FxError::from)?;

            Ok(stored.into())
        })
    }

    fn get_rate_on_or_before(
        &self,
        quote: &str,
        date: chrono::NaiveDate,
    ) -> Result<Option<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;

        // Dates are stored as %Y-%m-%d, so string ordering is date ordering.
        // Stored codes are uppercase; callers may pass any casing.
        let row = exchange_rates::table
            .filter(exchange_rates::quote_currency.eq(quote.to_ascii_uppercase()))
            .filter(exchange_rates::rate_date.le(format_date(date)))
            .order(exchange_rates::rate_date.desc())
            .first::<ExchangeRateDB>(&mut conn)
            .optional()
            .map_err(FxError::from)?;

        Ok(row.map(ExchangeRate::from))
    }

    fn has_rate(&self, base: &str, quote: &str, date: chrono::NaiveDate) -> Result<bool> {
        if base.eq_ignore_ascii_case(quote) {
            return Ok(true);
        }
        if base.eq_ignore_ascii_case(PIVOT_CURRENCY) {
            return self.pivot_leg_exists(quote, date);
        }
        if quote.eq_ignore_ascii_case(PIVOT_CURRENCY) {
            return self.pivot_leg_exists(base, date);
        }
        Ok(self.pivot_leg_exists(base, date)? && self.pivot_leg_exists(quote, date)?)
    }

    fn get_rates_for(&self, quote: &str) -> Result<Vec<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = exchange_rates::table
            .filter(exchange_rates::quote_currency.eq(quote.to_ascii_uppercase()))
            .order(exchange_rates::rate_date.asc())
            .load::<ExchangeRateDB>(&mut conn)
            .map_err(FxError::from)?;
        Ok(rows.into_iter().map(ExchangeRate::from).collect())
    }
}
