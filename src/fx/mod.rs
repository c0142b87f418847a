pub(crate) mod fx_errors;
pub(crate) mod fx_model;
pub(crate) mod fx_provider;
pub(crate) mod fx_repository;
pub(crate) mod fx_service;
pub(crate) mod fx_traits;
pub(crate) mod valuation;

pub use fx_errors::FxError;
pub use fx_model::{ExchangeRate, NewExchangeRate, ValuationLine};
pub use fx_provider::{DailyRateProvider, FrankfurterProvider, RateProviderGateway};
pub use fx_repository::RateStore;
pub use fx_service::FxService;
pub use fx_traits::{FxServiceTrait, RateStoreTrait};
pub use valuation::ValuationEngine;
