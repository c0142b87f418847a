use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::constants::{MONEY_SCALE, PIVOT_CURRENCY};
use crate::errors::{Error, Result};
use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::ValuationLine;
use crate::fx::fx_traits::RateStoreTrait;

/// Derives cross-rates through the pivot currency and computes
/// currency-normalized totals with an all-or-nothing completeness guarantee.
pub struct ValuationEngine {
    store: Arc<dyn RateStoreTrait>,
}

impl ValuationEngine {
    pub fn new(store: Arc<dyn RateStoreTrait>) -> Self {
        Self { store }
    }

    fn pivot_leg(&self, quote: &str, date: NaiveDate) -> Result<Decimal> {
        let rate = self
            .store
            .get_rate_on_or_before(quote, date)?
            .map(|r| r.rate)
            .ok_or_else(|| FxError::ConversionUnavailable {
                base: PIVOT_CURRENCY.to_string(),
                quote: quote.to_string(),
                date,
            })?;

        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(format!(
                "Stored rate for {} on or before {} is not positive: {}",
                quote, date, rate
            ))
            .into());
        }

        Ok(rate)
    }

    /// Exchange rate from `base` to `quote` on `date`, resolving each leg via
    /// the most recent stored pivot rate at or earlier than `date`. A missing
    /// leg makes the rate undefined; no forward-dated approximation.
    pub fn rate_for_date(&self, base: &str, quote: &str, date: NaiveDate) -> Result<Decimal> {
        if base.eq_ignore_ascii_case(quote) {
            return Ok(Decimal::ONE);
        }
        if base.eq_ignore_ascii_case(PIVOT_CURRENCY) {
            return self.pivot_leg(quote, date);
        }
        if quote.eq_ignore_ascii_case(PIVOT_CURRENCY) {
            return Ok(Decimal::ONE / self.pivot_leg(base, date)?);
        }

        // Both legs must resolve against the same requested date.
        let pivot_to_quote = self.pivot_leg(quote, date)?;
        let pivot_to_base = self.pivot_leg(base, date)?;
        Ok(pivot_to_quote / pivot_to_base)
    }

    pub fn convert_for_date(
        &self,
        amount: Decimal,
        base: &str,
        quote: &str,
        date: NaiveDate,
    ) -> Result<Decimal> {
        if base.eq_ignore_ascii_case(quote) {
            return Ok(amount);
        }
        let rate = self.rate_for_date(base, quote, date)?;
        Ok(amount * rate)
    }

    fn line_value(&self, line: &ValuationLine, target_currency: &str) -> Result<Decimal> {
        if line.currency.eq_ignore_ascii_case(target_currency) {
            return Ok(line.amount);
        }

        if let (Some(snapshot_currency), Some(snapshot_amount)) =
            (&line.snapshot_currency, line.snapshot_amount)
        {
            if snapshot_currency.eq_ignore_ascii_case(target_currency) {
                // Recorded at creation time; reusing it keeps historical
                // totals stable across rate revisions.
                return Ok(snapshot_amount);
            }
            return self.convert_for_date(
                snapshot_amount,
                snapshot_currency,
                target_currency,
                line.date,
            );
        }

        self.convert_for_date(line.amount, &line.currency, target_currency, line.date)
    }

    /// Currency-normalized sum over the given lines. Never returns a partial
    /// sum: any unresolvable leg fails the whole computation.
    pub fn calculate_total(
        &self,
        lines: &[ValuationLine],
        target_currency: &str,
    ) -> Result<Decimal> {
        let mut total = Decimal::ZERO;
        for line in lines {
            total += self.line_value(line, target_currency)?;
        }
        Ok(total.round_dp(MONEY_SCALE))
    }

    /// Completeness predicate for `calculate_total`: true when every line can
    /// be expressed in the target currency.
    pub fn has_all_rates_for_totals(
        &self,
        lines: &[ValuationLine],
        target_currency: &str,
    ) -> Result<bool> {
        for line in lines {
            match self.line_value(line, target_currency) {
                Ok(_) => {}
                Err(Error::Fx(FxError::ConversionUnavailable { .. })) => return Ok(false),
                Err(e) => return Err(e),
            }
        }
        Ok(true)
    }
}
