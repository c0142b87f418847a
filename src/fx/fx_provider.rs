use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::PIVOT_CURRENCY;
use crate::fx::fx_errors::FxError;
use crate::utils::format_date;

/// A single external source of daily pivot-relative rates.
#[async_trait]
pub trait DailyRateProvider: Send + Sync {
    fn name(&self) -> &str;

    /// One day's snapshot of pivot->currency rates. One request per day.
    async fn fetch_daily_rates(&self, date: NaiveDate)
        -> Result<HashMap<String, Decimal>, FxError>;
}

/// Ordered provider chain: tries each provider in sequence and returns the
/// first successful snapshot, failing only when every provider fails.
pub struct RateProviderGateway {
    providers: Vec<Arc<dyn DailyRateProvider>>,
}

impl RateProviderGateway {
    pub fn new(providers: Vec<Arc<dyn DailyRateProvider>>) -> Self {
        Self { providers }
    }

    pub async fn fetch_daily_rates(
        &self,
        date: NaiveDate,
    ) -> Result<HashMap<String, Decimal>, FxError> {
        for provider in &self.providers {
            match provider.fetch_daily_rates(date).await {
                Ok(rates) if !rates.is_empty() => return Ok(rates),
                Ok(_) => {
                    warn!(
                        "Rate provider '{}' returned no rates for {}",
                        provider.name(),
                        date
                    );
                }
                Err(e) => {
                    warn!(
                        "Rate provider '{}' failed for {}: {}",
                        provider.name(),
                        date,
                        e
                    );
                }
            }
        }

        Err(FxError::ProviderError(format!(
            "All {} rate providers failed for {}",
            self.providers.len(),
            date
        )))
    }
}

#[derive(Debug, Deserialize)]
struct DailySnapshotResponse {
    #[allow(dead_code)]
    base: String,
    rates: HashMap<String, Decimal>,
}

/// ECB-style daily snapshot provider (Frankfurter API shape).
pub struct FrankfurterProvider {
    client: reqwest::Client,
    base_url: String,
}

impl FrankfurterProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.frankfurter.app";

    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DailyRateProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "frankfurter"
    }

    async fn fetch_daily_rates(
        &self,
        date: NaiveDate,
    ) -> Result<HashMap<String, Decimal>, FxError> {
        let url = format!(
            "{}/{}?from={}",
            self.base_url,
            format_date(date),
            PIVOT_CURRENCY
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FxError::ProviderError(format!(
                "Unexpected status {} from {}",
                response.status(),
                url
            )));
        }

        let snapshot: DailySnapshotResponse = response.json().await?;
        Ok(snapshot.rates)
    }
}
