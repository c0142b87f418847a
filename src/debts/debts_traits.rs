use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::watch;

use super::debts_model::{Debt, DebtStatus, NewDebt};
use crate::errors::Result;

/// Trait defining the contract for debt storage operations.
#[async_trait]
pub trait DebtRepositoryTrait: Send + Sync {
    async fn create(&self, new_debt: NewDebt) -> Result<Debt>;
    async fn set_status(&self, debt_id: &str, status: DebtStatus) -> Result<Debt>;
    async fn delete(&self, debt_id: &str) -> Result<()>;
    fn get_by_id(&self, debt_id: &str) -> Result<Debt>;
    fn list(&self) -> Result<Vec<Debt>>;
}

/// Trait defining the contract for debt reconciliation operations.
#[async_trait]
pub trait DebtServiceTrait: Send + Sync {
    async fn create_debt(&self, new_debt: NewDebt) -> Result<Debt>;
    async fn delete_debt(&self, debt_id: &str) -> Result<()>;
    fn get_debt(&self, debt_id: &str) -> Result<Debt>;
    fn list_debts(&self) -> Result<Vec<Debt>>;

    /// Sum of linked income payments expressed in `debt_currency`, each
    /// converted at its own transaction date. A payment with no derivable
    /// rate is omitted from the sum.
    fn calculate_paid_amount(&self, debt_id: &str, debt_currency: &str) -> Result<Decimal>;

    /// Recomputes OPEN/CLOSED from the paid amount, persisting only on
    /// change. Returns whether the status changed.
    async fn reconcile_status(&self, debt_id: &str) -> Result<bool>;

    fn subscribe_debts(&self) -> watch::Receiver<Vec<Debt>>;
}
