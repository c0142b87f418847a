use async_trait::async_trait;
use tokio::sync::watch;

use super::ledger_model::{
    NewTransaction, NewTransfer, Transaction, TransactionUpdate, Transfer, TransferUpdate,
    ValuationSnapshot,
};
use crate::accounts::Account;
use crate::categories::Category;
use crate::errors::Result;

/// Trait defining the contract for ledger storage operations. Every mutation
/// applies the record write and the balance effect as one database
/// transaction.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    async fn add_transaction(
        &self,
        new_transaction: NewTransaction,
        snapshot: Option<ValuationSnapshot>,
    ) -> Result<Transaction>;

    async fn update_transaction(
        &self,
        update: TransactionUpdate,
        snapshot: Option<ValuationSnapshot>,
    ) -> Result<Transaction>;

    /// Deletes a transaction and reverses its balance effect. Returns the
    /// deleted record so the caller can reconcile any linked debt.
    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;
    fn list_transactions(&self) -> Result<Vec<Transaction>>;

    /// Income transactions linked to the given debt.
    fn get_debt_payments(&self, debt_id: &str) -> Result<Vec<Transaction>>;

    async fn add_transfer(
        &self,
        new_transfer: NewTransfer,
        snapshot: Option<ValuationSnapshot>,
    ) -> Result<Transfer>;

    async fn update_transfer(
        &self,
        update: TransferUpdate,
        snapshot: Option<ValuationSnapshot>,
    ) -> Result<Transfer>;

    async fn delete_transfer(&self, transfer_id: &str) -> Result<Transfer>;

    fn get_transfer(&self, transfer_id: &str) -> Result<Transfer>;
    fn list_transfers(&self) -> Result<Vec<Transfer>>;

    /// Renames the entity and bulk-patches every referencing row as one
    /// database transaction.
    async fn rename_account(&self, account_id: &str, new_name: &str) -> Result<Account>;
    async fn rename_category(&self, category_id: &str, new_name: &str) -> Result<Category>;
}

/// Trait defining the contract for ledger service operations.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    async fn update_transaction(&self, update: TransactionUpdate) -> Result<Transaction>;
    async fn delete_transaction(&self, transaction_id: &str) -> Result<()>;

    async fn add_transfer(&self, new_transfer: NewTransfer) -> Result<Transfer>;
    async fn update_transfer(&self, update: TransferUpdate) -> Result<Transfer>;
    async fn delete_transfer(&self, transfer_id: &str) -> Result<()>;

    async fn rename_account(&self, account_id: &str, new_name: &str) -> Result<Account>;
    async fn rename_category(&self, category_id: &str, new_name: &str) -> Result<Category>;

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;
    fn list_transactions(&self) -> Result<Vec<Transaction>>;
    fn get_transfer(&self, transfer_id: &str) -> Result<Transfer>;
    fn list_transfers(&self) -> Result<Vec<Transfer>>;

    fn subscribe_accounts(&self) -> watch::Receiver<Vec<Account>>;
    fn subscribe_transactions(&self) -> watch::Receiver<Vec<Transaction>>;
    fn subscribe_transfers(&self) -> watch::Receiver<Vec<Transfer>>;
}

/// Read-only point-in-time snapshot access over accounts and categories.
/// A single read each; callers fail fast on empty results instead of waiting
/// for entities to appear.
pub trait EntityLookupTrait: Send + Sync {
    fn current_accounts(&self) -> Result<Vec<Account>>;
    fn current_categories(&self) -> Result<Vec<Category>>;
}
