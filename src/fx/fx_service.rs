use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::constants::PIVOT_CURRENCY;
use crate::errors::Result;
use crate::fx::fx_model::{ExchangeRate, NewExchangeRate, ValuationLine};
use crate::fx::fx_provider::RateProviderGateway;
use crate::fx::fx_traits::{FxServiceTrait, RateStoreTrait};
use crate::fx::valuation::ValuationEngine;

/// Orchestrates the rate store, the provider gateway and the valuation
/// engine. All conversion entry points for the rest of the core go through
/// this service.
pub struct FxService {
    store: Arc<dyn RateStoreTrait>,
    gateway: RateProviderGateway,
    engine: ValuationEngine,
}

impl FxService {
    pub fn new(store: Arc<dyn RateStoreTrait>, gateway: RateProviderGateway) -> Self {
        let engine = ValuationEngine::new(store.clone());
        Self {
            store,
            gateway,
            engine,
        }
    }
}

#[async_trait::async_trait]
impl FxServiceTrait for FxService {
    async fn set_manual_eur_pivot(
        &self,
        quote_currency: &str,
        date: NaiveDate,
        rate: Decimal,
    ) -> Result<ExchangeRate> {
        debug!(
            "Storing manual {} pivot rate {}/{} = {} for {}",
            PIVOT_CURRENCY, PIVOT_CURRENCY, quote_currency, rate, date
        );
        self.store
            .set_rate(NewExchangeRate {
                quote_currency: quote_currency.to_string(),
                rate_date: date,
                rate,
            })
            .await
    }

    async fn ensure_rates_for(&self, date: NaiveDate, currencies: &[String]) -> Result<()> {
        let mut missing: Vec<&String> = Vec::new();
        for currency in currencies {
            if currency.eq_ignore_ascii_case(PIVOT_CURRENCY) {
                continue;
            }
            if !self.store.has_rate(PIVOT_CURRENCY, currency, date)? {
                missing.push(currency);
            }
        }

        if missing.is_empty() {
            return Ok(());
        }

        let snapshot = self.gateway.fetch_daily_rates(date).await?;

        for (quote_currency, rate) in snapshot {
            if quote_currency.eq_ignore_ascii_case(PIVOT_CURRENCY) {
                continue;
            }
            if let Err(e) = self
                .store
                .set_rate(NewExchangeRate {
                    quote_currency: quote_currency.clone(),
                    rate_date: date,
                    rate,
                })
                .await
            {
                warn!(
                    "Skipping provider rate {}/{} for {}: {}",
                    PIVOT_CURRENCY, quote_currency, date, e
                );
            }
        }

        for currency in missing {
            if !self.store.has_rate(PIVOT_CURRENCY, currency, date)? {
                warn!(
                    "No provider rate for {} on {} after sync; a manual pivot rate may be required",
                    currency, date
                );
            }
        }

        Ok(())
    }

    fn rate_for_date(&self, base: &str, quote: &str, date: NaiveDate) -> Result<Decimal> {
        self.engine.rate_for_date(base, quote, date)
    }

    fn convert_for_date(
        &self,
        amount: Decimal,
        base: &str,
        quote: &str,
        date: NaiveDate,
    ) -> Result<Decimal> {
        self.engine.convert_for_date(amount, base, quote, date)
    }

    fn calculate_total(&self, lines: &[ValuationLine], target_currency: &str) -> Result<Decimal> {
        self.engine.calculate_total(lines, target_currency)
    }

    fn has_all_rates_for_totals(
        &self,
        lines: &[ValuationLine],
        target_currency: &str,
    ) -> Result<bool> {
        self.engine.has_all_rates_for_totals(lines, target_currency)
    }
}
