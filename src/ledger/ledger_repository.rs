use diesel::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::accounts::{Account, AccountDB, AccountError};
use crate::categories::{Category, CategoryDB, CategoryError};
use crate::constants::MONEY_SCALE;
use crate::db::{get_connection, DbConnection, DbPool, DbTransactionExecutor};
use crate::errors::Result;
use crate::ledger::ledger_errors::LedgerError;
use crate::ledger::ledger_model::{
    NewTransaction, NewTransfer, Transaction, TransactionDB, TransactionType, TransactionUpdate,
    Transfer, TransferDB, TransferUpdate, ValuationSnapshot,
};
use crate::ledger::ledger_traits::LedgerRepositoryTrait;
use crate::schema::{accounts, categories, transactions, transfers};
use crate::utils::{now_string, parse_decimal};

/// Repository owning transaction and transfer rows together with their
/// account balance effects. Every mutation here runs inside one database
/// transaction, so a partial application is never observable.
pub struct LedgerRepository {
    pool: Arc<DbPool>,
}

impl LedgerRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

// Name lookups rely on the NOCASE collation of the name columns.
fn find_account(
    conn: &mut DbConnection,
    name: &str,
) -> std::result::Result<AccountDB, LedgerError> {
    accounts::table
        .filter(accounts::name.eq(name))
        .first::<AccountDB>(conn)
        .optional()
        .map_err(LedgerError::from)?
        .ok_or_else(|| LedgerError::AccountNotFound(name.to_string()))
}

fn find_category(
    conn: &mut DbConnection,
    name: &str,
) -> std::result::Result<CategoryDB, LedgerError> {
    categories::table
        .filter(categories::name.eq(name))
        .first::<CategoryDB>(conn)
        .optional()
        .map_err(LedgerError::from)?
        .ok_or_else(|| LedgerError::CategoryNotFound(name.to_string()))
}

fn adjust_balance(
    conn: &mut DbConnection,
    account: &AccountDB,
    delta: Decimal,
) -> std::result::Result<(), LedgerError> {
    let balance = parse_decimal(&account.balance, "balance");
    let next = (balance + delta).round_dp(MONEY_SCALE);

    diesel::update(accounts::table.find(&account.id))
        .set((
            accounts::balance.eq(next.to_string()),
            accounts::updated_at.eq(now_string()),
        ))
        .execute(conn)
        .map_err(LedgerError::from)?;

    Ok(())
}

fn signed_amount(txn_type: TransactionType, amount: Decimal) -> Decimal {
    match txn_type {
        TransactionType::Expense => -amount,
        TransactionType::Income => amount,
    }
}

/// Amount credited to the destination account. Cross-currency transfers are
/// committed only with an explicit destination amount whose currency matches
/// the destination account.
fn transfer_credit(
    source: &AccountDB,
    destination: &AccountDB,
    amount: Decimal,
    destination_amount: Option<Decimal>,
    destination_currency: Option<&str>,
) -> std::result::Result<Decimal, LedgerError> {
    match (destination_amount, destination_currency) {
        (Some(credit), Some(code)) => {
            if !code.eq_ignore_ascii_case(&destination.currency) {
                return Err(LedgerError::CurrencyMismatch {
                    src: source.currency.clone(),
                    destination: destination.currency.clone(),
                });
            }
            Ok(credit)
        }
        (None, None) if source.currency.eq_ignore_ascii_case(&destination.currency) => Ok(amount),
        _ => Err(LedgerError::CurrencyMismatch {
            src: source.currency.clone(),
            destination: destination.currency.clone(),
        }),
    }
}

fn apply_snapshot(row: &mut TransactionDB, snapshot: Option<ValuationSnapshot>) {
    if let Some(snap) = snapshot {
        row.original_default_currency_code = Some(snap.currency_code);
        row.amount_in_original_default = Some(snap.amount.round_dp(MONEY_SCALE).to_string());
    }
}

fn apply_transfer_snapshot(row: &mut TransferDB, snapshot: Option<ValuationSnapshot>) {
    if let Some(snap) = snapshot {
        row.original_default_currency_code = Some(snap.currency_code);
        row.amount_in_original_default = Some(snap.amount.round_dp(MONEY_SCALE).to_string());
    }
}

#[async_trait::async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    async fn add_transaction(
        &self,
        new_transaction: NewTransaction,
        snapshot: Option<ValuationSnapshot>,
    ) -> Result<Transaction> {
        new_transaction.validate()?;
        let delta = signed_amount(new_transaction.txn_type, new_transaction.amount);

        self.pool.execute(move |conn| -> Result<Transaction> {
            let account = find_account(conn, &new_transaction.account_name)?;
            let category = find_category(conn, &new_transaction.category_name)?;

            let mut row: TransactionDB = new_transaction.into();
            if row.id.is_empty() {
                row.id = Uuid::new_v4().to_string();
            }
            // Store canonical casing from the resolved rows
            row.account_name = account.name.clone();
            row.category_name = category.name;
            apply_snapshot(&mut row, snapshot);

            adjust_balance(conn, &account, delta)?;

            diesel::insert_into(transactions::table)
                .values(&row)
                .execute(conn)
                .map_err(LedgerError::from)?;

            Ok(row.into())
        })
    }

    async fn update_transaction(
        &self,
        update: TransactionUpdate,
        snapshot: Option<ValuationSnapshot>,
    ) -> Result<Transaction> {
        update.validate()?;
        let new_delta = signed_amount(update.txn_type, update.amount);

        self.pool.execute(move |conn| -> Result<Transaction> {
            let existing = transactions::table
                .find(&update.id)
                .first::<TransactionDB>(conn)
                .map_err(LedgerError::from)?;

            // Reverse the old effect, then apply the new one against the
            // re-read balance.
            let old_account = find_account(conn, &existing.account_name)?;
            let old_delta = signed_amount(
                TransactionType::from(existing.txn_type.as_str()),
                parse_decimal(&existing.amount, "amount"),
            );
            adjust_balance(conn, &old_account, -old_delta)?;

            let new_account = find_account(conn, &update.account_name)?;
            let category = find_category(conn, &update.category_name)?;
            adjust_balance(conn, &new_account, new_delta)?;

            let mut row: TransactionDB = update.into();
            row.account_name = new_account.name;
            row.category_name = category.name;
            row.created_at = existing.created_at.clone();
            apply_snapshot(&mut row, snapshot);

            diesel::update(transactions::table.find(&existing.id))
                .set(&row)
                .execute(conn)
                .map_err(LedgerError::from)?;

            Ok(row.into())
        })
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let id = transaction_id.to_string();
        self.pool.execute(move |conn| -> Result<Transaction> {
            let existing = transactions::table
                .find(&id)
                .first::<TransactionDB>(conn)
                .map_err(LedgerError::from)?;

            let account = find_account(conn, &existing.account_name)?;
            let delta = signed_amount(
                TransactionType::from(existing.txn_type.as_str()),
                parse_decimal(&existing.amount, "amount"),
            );

            diesel::delete(transactions::table.find(&id))
                .execute(conn)
                .map_err(LedgerError::from)?;

            adjust_balance(conn, &account, -delta)?;

            Ok(existing.into())
        })
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        let row = transactions::table
            .find(transaction_id)
            .first::<TransactionDB>(&mut conn)
            .map_err(LedgerError::from)?;
        Ok(row.into())
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .order(transactions::txn_date.desc())
            .load::<TransactionDB>(&mut conn)
            .map_err(LedgerError::from)?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    fn get_debt_payments(&self, debt_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .filter(transactions::related_debt_id.eq(debt_id))
            .filter(transactions::txn_type.eq(TransactionType::Income.as_str()))
            .load::<TransactionDB>(&mut conn)
            .map_err(LedgerError::from)?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    async fn add_transfer(
        &self,
        new_transfer: NewTransfer,
        snapshot: Option<ValuationSnapshot>,
    ) -> Result<Transfer> {
        new_transfer.validate()?;

        self.pool.execute(move |conn| -> Result<Transfer> {
            let source = find_account(conn, &new_transfer.source_account)?;
            let destination = find_account(conn, &new_transfer.destination_account)?;

            let credit = transfer_credit(
                &source,
                &destination,
                new_transfer.amount,
                new_transfer.destination_amount,
                new_transfer.destination_currency.as_deref(),
            )?;
            let debit = new_transfer.amount;

            let mut row: TransferDB = new_transfer.into();
            if row.id.is_empty() {
                row.id = Uuid::new_v4().to_string();
            }
            row.source_account = source.name.clone();
            row.destination_account = destination.name.clone();
            apply_transfer_snapshot(&mut row, snapshot);

            adjust_balance(conn, &source, -debit)?;
            adjust_balance(conn, &destination, credit)?;

            diesel::insert_into(transfers::table)
                .values(&row)
                .execute(conn)
                .map_err(LedgerError::from)?;

            Ok(row.into())
        })
    }

    async fn update_transfer(
        &self,
        update: TransferUpdate,
        snapshot: Option<ValuationSnapshot>,
    ) -> Result<Transfer> {
        update.validate()?;

        self.pool.execute(move |conn| -> Result<Transfer> {
            let existing = transfers::table
                .find(&update.id)
                .first::<TransferDB>(conn)
                .map_err(LedgerError::from)?;

            let old: Transfer = existing.clone().into();
            let old_source = find_account(conn, &old.source_account)?;
            let old_destination = find_account(conn, &old.destination_account)?;

            adjust_balance(conn, &old_source, old.amount)?;
            adjust_balance(conn, &old_destination, -old.credited_amount())?;

            let source = find_account(conn, &update.source_account)?;
            let destination = find_account(conn, &update.destination_account)?;
            let credit = transfer_credit(
                &source,
                &destination,
                update.amount,
                update.destination_amount,
                update.destination_currency.as_deref(),
            )?;
            let debit = update.amount;

            adjust_balance(conn, &source, -debit)?;
            adjust_balance(conn, &destination, credit)?;

            let mut row: TransferDB = update.into();
            row.source_account = source.name;
            row.destination_account = destination.name;
            row.created_at = existing.created_at.clone();
            apply_transfer_snapshot(&mut row, snapshot);

            diesel::update(transfers::table.find(&existing.id))
                .set(&row)
                .execute(conn)
                .map_err(LedgerError::from)?;

            Ok(row.into())
        })
    }

    async fn delete_transfer(&self, transfer_id: &str) -> Result<Transfer> {
        let id = transfer_id.to_string();
        self.pool.execute(move |conn| -> Result<Transfer> {
            let existing: Transfer = transfers::table
                .find(&id)
                .first::<TransferDB>(conn)
                .map_err(LedgerError::from)?
                .into();

            let source = find_account(conn, &existing.source_account)?;
            let destination = find_account(conn, &existing.destination_account)?;

            diesel::delete(transfers::table.find(&id))
                .execute(conn)
                .map_err(LedgerError::from)?;

            adjust_balance(conn, &source, existing.amount)?;
            adjust_balance(conn, &destination, -existing.credited_amount())?;

            Ok(existing)
        })
    }

    fn get_transfer(&self, transfer_id: &str) -> Result<Transfer> {
        let mut conn = get_connection(&self.pool)?;
        let row = transfers::table
            .find(transfer_id)
            .first::<TransferDB>(&mut conn)
            .map_err(LedgerError::from)?;
        Ok(row.into())
    }

    fn list_transfers(&self) -> Result<Vec<Transfer>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transfers::table
            .order(transfers::txn_date.desc())
            .load::<TransferDB>(&mut conn)
            .map_err(LedgerError::from)?;
        Ok(rows.into_iter().map(Transfer::from).collect())
    }

    async fn rename_account(&self, account_id: &str, new_name: &str) -> Result<Account> {
        let id = account_id.to_string();
        let name = new_name.trim().to_string();
        if name.is_empty() {
            return Err(AccountError::InvalidData("New account name is empty".to_string()).into());
        }

        self.pool.execute(move |conn| -> Result<Account> {
            let account = accounts::table
                .find(&id)
                .first::<AccountDB>(conn)
                .map_err(AccountError::from)?;

            let clash = accounts::table
                .filter(accounts::name.eq(&name))
                .filter(accounts::id.ne(&id))
                .first::<AccountDB>(conn)
                .optional()
                .map_err(AccountError::from)?;
            if clash.is_some() {
                return Err(AccountError::DuplicateName(name.clone()).into());
            }

            let now = now_string();
            diesel::update(accounts::table.find(&id))
                .set((accounts::name.eq(&name), accounts::updated_at.eq(&now)))
                .execute(conn)
                .map_err(AccountError::from)?;

            diesel::update(
                transactions::table.filter(transactions::account_name.eq(&account.name)),
            )
            .set((
                transactions::account_name.eq(&name),
                transactions::updated_at.eq(&now),
            ))
            .execute(conn)
            .map_err(LedgerError::from)?;

            diesel::update(transfers::table.filter(transfers::source_account.eq(&account.name)))
                .set((
                    transfers::source_account.eq(&name),
                    transfers::updated_at.eq(&now),
                ))
                .execute(conn)
                .map_err(LedgerError::from)?;

            diesel::update(
                transfers::table.filter(transfers::destination_account.eq(&account.name)),
            )
            .set((
                transfers::destination_account.eq(&name),
                transfers::updated_at.eq(&now),
            ))
            .execute(conn)
            .map_err(LedgerError::from)?;

            let updated = accounts::table
                .find(&id)
                .first::<AccountDB>(conn)
                .map_err(AccountError::from)?;
            Ok(updated.into())
        })
    }

    async fn rename_category(&self, category_id: &str, new_name: &str) -> Result<Category> {
        let id = category_id.to_string();
        let name = new_name.trim().to_string();
        if name.is_empty() {
            return Err(
                CategoryError::InvalidData("New category name is empty".to_string()).into(),
            );
        }

        self.pool.execute(move |conn| -> Result<Category> {
            let category = categories::table
                .find(&id)
                .first::<CategoryDB>(conn)
                .map_err(CategoryError::from)?;

            let clash = categories::table
                .filter(categories::name.eq(&name))
                .filter(categories::id.ne(&id))
                .first::<CategoryDB>(conn)
                .optional()
                .map_err(CategoryError::from)?;
            if clash.is_some() {
                return Err(CategoryError::DuplicateName(name.clone()).into());
            }

            let now = now_string();
            diesel::update(categories::table.find(&id))
                .set((categories::name.eq(&name), categories::updated_at.eq(&now)))
                .execute(conn)
                .map_err(CategoryError::from)?;

            diesel::update(
                transactions::table.filter(transactions::category_name.eq(&category.name)),
            )
            .set((
                transactions::category_name.eq(&name),
                transactions::updated_at.eq(&now),
            ))
            .execute(conn)
            .map_err(LedgerError::from)?;

            let updated = categories::table
                .find(&id)
                .first::<CategoryDB>(conn)
                .map_err(CategoryError::from)?;
            Ok(updated.into())
        })
    }
}
