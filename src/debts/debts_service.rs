use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::watch;

use crate::constants::MONEY_SCALE;
use crate::debts::debts_model::{Debt, DebtStatus, NewDebt};
use crate::debts::debts_traits::{DebtRepositoryTrait, DebtServiceTrait};
use crate::errors::{Error, Result};
use crate::fx::{FxError, FxServiceTrait};
use crate::ledger::LedgerRepositoryTrait;

/// Service reconciling debts against their linked income payments.
pub struct DebtService {
    repository: Arc<dyn DebtRepositoryTrait>,
    ledger: Arc<dyn LedgerRepositoryTrait>,
    fx: Arc<dyn FxServiceTrait>,
    debts_tx: watch::Sender<Vec<Debt>>,
}

impl DebtService {
    pub fn new(
        repository: Arc<dyn DebtRepositoryTrait>,
        ledger: Arc<dyn LedgerRepositoryTrait>,
        fx: Arc<dyn FxServiceTrait>,
    ) -> Self {
        let (debts_tx, _) = watch::channel(Vec::new());
        Self {
            repository,
            ledger,
            fx,
            debts_tx,
        }
    }

    fn publish_read_model(&self) {
        match self.repository.list() {
            Ok(debts) => {
                self.debts_tx.send_replace(debts);
            }
            Err(e) => warn!("Failed to refresh debts read model: {}", e),
        }
    }
}

#[async_trait::async_trait]
impl DebtServiceTrait for DebtService {
    async fn create_debt(&self, new_debt: NewDebt) -> Result<Debt> {
        let debt = self.repository.create(new_debt).await?;
        self.publish_read_model();
        Ok(debt)
    }

    async fn delete_debt(&self, debt_id: &str) -> Result<()> {
        self.repository.delete(debt_id).await?;
        self.publish_read_model();
        Ok(())
    }

    fn get_debt(&self, debt_id: &str) -> Result<Debt> {
        self.repository.get_by_id(debt_id)
    }

    fn list_debts(&self) -> Result<Vec<Debt>> {
        self.repository.list()
    }

    fn calculate_paid_amount(&self, debt_id: &str, debt_currency: &str) -> Result<Decimal> {
        let payments = self.ledger.get_debt_payments(debt_id)?;

        let mut total = Decimal::ZERO;
        for payment in payments {
            if payment.currency.eq_ignore_ascii_case(debt_currency) {
                total += payment.amount;
                continue;
            }
            match self.fx.convert_for_date(
                payment.amount,
                &payment.currency,
                debt_currency,
                payment.txn_date,
            ) {
                Ok(converted) => total += converted,
                Err(Error::Fx(FxError::ConversionUnavailable { .. })) => {
                    // Fail-open: an unconvertible payment is omitted rather
                    // than failing the whole reconciliation.
                    warn!(
                        "Skipping payment '{}' for debt '{}': no {}/{} rate on or before {}",
                        payment.id, debt_id, payment.currency, debt_currency, payment.txn_date
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(total.round_dp(MONEY_SCALE))
    }

    async fn reconcile_status(&self, debt_id: &str) -> Result<bool> {
        let debt = self.repository.get_by_id(debt_id)?;
        let parent = self.ledger.get_transaction(&debt.parent_expense_id)?;

        let paid = self.calculate_paid_amount(debt_id, &parent.currency)?;
        let next = if paid >= parent.amount {
            DebtStatus::Closed
        } else {
            DebtStatus::Open
        };

        if next == debt.status {
            return Ok(false);
        }

        debug!(
            "Debt '{}': paid {} of {} {}, status {} -> {}",
            debt_id,
            paid,
            parent.amount,
            parent.currency,
            debt.status.as_str(),
            next.as_str()
        );
        self.repository.set_status(debt_id, next).await?;
        self.publish_read_model();
        Ok(true)
    }

    fn subscribe_debts(&self) -> watch::Receiver<Vec<Debt>> {
        self.debts_tx.subscribe()
    }
}
