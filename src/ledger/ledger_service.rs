use chrono::NaiveDate;
use log::{debug, error, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::watch;

use crate::accounts::Account;
use crate::categories::Category;
use crate::constants::MONEY_SCALE;
use crate::debts::DebtServiceTrait;
use crate::errors::{Error, Result};
use crate::fx::{FxError, FxServiceTrait};
use crate::ledger::ledger_errors::LedgerError;
use crate::ledger::ledger_model::{
    NewTransaction, NewTransfer, Transaction, TransactionUpdate, Transfer, TransferUpdate,
    ValuationSnapshot,
};
use crate::ledger::ledger_traits::{EntityLookupTrait, LedgerRepositoryTrait, LedgerServiceTrait};

/// Service owning transaction and transfer commits. Resolves references
/// against a point-in-time entity snapshot before touching the store,
/// captures valuation snapshots, triggers debt reconciliation, and re-emits
/// the read models after every successful commit.
pub struct LedgerService {
    repository: Arc<dyn LedgerRepositoryTrait>,
    lookup: Arc<dyn EntityLookupTrait>,
    fx: Arc<dyn FxServiceTrait>,
    debts: Arc<dyn DebtServiceTrait>,
    default_currency: String,
    accounts_tx: watch::Sender<Vec<Account>>,
    transactions_tx: watch::Sender<Vec<Transaction>>,
    transfers_tx: watch::Sender<Vec<Transfer>>,
}

impl LedgerService {
    pub fn new(
        repository: Arc<dyn LedgerRepositoryTrait>,
        lookup: Arc<dyn EntityLookupTrait>,
        fx: Arc<dyn FxServiceTrait>,
        debts: Arc<dyn DebtServiceTrait>,
        default_currency: String,
    ) -> Self {
        let (accounts_tx, _) = watch::channel(Vec::new());
        let (transactions_tx, _) = watch::channel(Vec::new());
        let (transfers_tx, _) = watch::channel(Vec::new());
        Self {
            repository,
            lookup,
            fx,
            debts,
            default_currency,
            accounts_tx,
            transactions_tx,
            transfers_tx,
        }
    }

    fn resolve_account<'a>(accounts: &'a [Account], name: &str) -> Result<&'a Account> {
        accounts
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| LedgerError::AccountNotFound(name.to_string()).into())
    }

    fn resolve_category<'a>(categories: &'a [Category], name: &str) -> Result<&'a Category> {
        categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| LedgerError::CategoryNotFound(name.to_string()).into())
    }

    /// Value in the default currency at commit time. Best-effort: absent when
    /// no rate is derivable.
    fn valuation_snapshot(
        &self,
        amount: Decimal,
        currency: &str,
        date: NaiveDate,
    ) -> Result<Option<ValuationSnapshot>> {
        if currency.eq_ignore_ascii_case(&self.default_currency) {
            return Ok(None);
        }
        match self
            .fx
            .convert_for_date(amount, currency, &self.default_currency, date)
        {
            Ok(converted) => Ok(Some(ValuationSnapshot {
                currency_code: self.default_currency.clone(),
                amount: converted.round_dp(MONEY_SCALE),
            })),
            Err(Error::Fx(FxError::ConversionUnavailable { .. })) => {
                debug!(
                    "No {}/{} rate on or before {}; omitting valuation snapshot",
                    currency, self.default_currency, date
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn reconcile_debt(&self, debt_id: &str) {
        // The commit is already applied; a reconciliation failure must not
        // be reported as a failed commit.
        if let Err(e) = self.debts.reconcile_status(debt_id).await {
            error!("Debt reconciliation for '{}' failed: {}", debt_id, e);
        }
    }

    fn publish_read_models(&self) {
        match self.lookup.current_accounts() {
            Ok(accounts) => {
                self.accounts_tx.send_replace(accounts);
            }
            Err(e) => warn!("Failed to refresh accounts read model: {}", e),
        }
        match self.repository.list_transactions() {
            Ok(txns) => {
                self.transactions_tx.send_replace(txns);
            }
            Err(e) => warn!("Failed to refresh transactions read model: {}", e),
        }
        match self.repository.list_transfers() {
            Ok(transfers) => {
                self.transfers_tx.send_replace(transfers);
            }
            Err(e) => warn!("Failed to refresh transfers read model: {}", e),
        }
    }
}

#[async_trait::async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;

        // Single snapshot read; a missing reference fails fast here instead
        // of surfacing halfway through the commit.
        let accounts = self.lookup.current_accounts()?;
        Self::resolve_account(&accounts, &new_transaction.account_name)?;
        let categories = self.lookup.current_categories()?;
        Self::resolve_category(&categories, &new_transaction.category_name)?;

        let snapshot = self.valuation_snapshot(
            new_transaction.amount,
            &new_transaction.currency,
            new_transaction.txn_date,
        )?;

        let transaction = self
            .repository
            .add_transaction(new_transaction, snapshot)
            .await?;

        if let Some(debt_id) = transaction.related_debt_id.clone() {
            self.reconcile_debt(&debt_id).await;
        }
        self.publish_read_models();
        Ok(transaction)
    }

    async fn update_transaction(&self, update: TransactionUpdate) -> Result<Transaction> {
        update.validate()?;

        let accounts = self.lookup.current_accounts()?;
        Self::resolve_account(&accounts, &update.account_name)?;
        let categories = self.lookup.current_categories()?;
        Self::resolve_category(&categories, &update.category_name)?;

        let previous = self.repository.get_transaction(&update.id)?;
        let snapshot = self.valuation_snapshot(update.amount, &update.currency, update.txn_date)?;

        let transaction = self.repository.update_transaction(update, snapshot).await?;

        // Both the previously linked debt and the new one are affected.
        if let Some(debt_id) = previous.related_debt_id.as_deref() {
            if transaction.related_debt_id.as_deref() != Some(debt_id) {
                self.reconcile_debt(debt_id).await;
            }
        }
        if let Some(debt_id) = transaction.related_debt_id.clone() {
            self.reconcile_debt(&debt_id).await;
        }
        self.publish_read_models();
        Ok(transaction)
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<()> {
        let deleted = self.repository.delete_transaction(transaction_id).await?;
        if let Some(debt_id) = deleted.related_debt_id {
            self.reconcile_debt(&debt_id).await;
        }
        self.publish_read_models();
        Ok(())
    }

    async fn add_transfer(&self, new_transfer: NewTransfer) -> Result<Transfer> {
        new_transfer.validate()?;

        let accounts = self.lookup.current_accounts()?;
        Self::resolve_account(&accounts, &new_transfer.source_account)?;
        Self::resolve_account(&accounts, &new_transfer.destination_account)?;

        let snapshot = self.valuation_snapshot(
            new_transfer.amount,
            &new_transfer.currency,
            new_transfer.txn_date,
        )?;

        let transfer = self.repository.add_transfer(new_transfer, snapshot).await?;
        self.publish_read_models();
        Ok(transfer)
    }

    async fn update_transfer(&self, update: TransferUpdate) -> Result<Transfer> {
        update.validate()?;

        let accounts = self.lookup.current_accounts()?;
        Self::resolve_account(&accounts, &update.source_account)?;
        Self::resolve_account(&accounts, &update.destination_account)?;

        let snapshot = self.valuation_snapshot(update.amount, &update.currency, update.txn_date)?;

        let transfer = self.repository.update_transfer(update, snapshot).await?;
        self.publish_read_models();
        Ok(transfer)
    }

    async fn delete_transfer(&self, transfer_id: &str) -> Result<()> {
        self.repository.delete_transfer(transfer_id).await?;
        self.publish_read_models();
        Ok(())
    }

    async fn rename_account(&self, account_id: &str, new_name: &str) -> Result<Account> {
        let account = self.repository.rename_account(account_id, new_name).await?;
        self.publish_read_models();
        Ok(account)
    }

    async fn rename_category(&self, category_id: &str, new_name: &str) -> Result<Category> {
        let category = self
            .repository
            .rename_category(category_id, new_name)
            .await?;
        self.publish_read_models();
        Ok(category)
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.repository.get_transaction(transaction_id)
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.repository.list_transactions()
    }

    fn get_transfer(&self, transfer_id: &str) -> Result<Transfer> {
        self.repository.get_transfer(transfer_id)
    }

    fn list_transfers(&self) -> Result<Vec<Transfer>> {
        self.repository.list_transfers()
    }

    fn subscribe_accounts(&self) -> watch::Receiver<Vec<Account>> {
        self.accounts_tx.subscribe()
    }

    fn subscribe_transactions(&self) -> watch::Receiver<Vec<Transaction>> {
        self.transactions_tx.subscribe()
    }

    fn subscribe_transfers(&self) -> watch::Receiver<Vec<Transfer>> {
        self.transfers_tx.subscribe()
    }
}
