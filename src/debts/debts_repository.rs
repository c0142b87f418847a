use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{get_connection, DbPool, DbTransactionExecutor};
use crate::debts::debts_errors::DebtError;
use crate::debts::debts_model::{Debt, DebtDB, DebtStatus, NewDebt};
use crate::debts::debts_traits::DebtRepositoryTrait;
use crate::errors::Result;
use crate::ledger::TransactionType;
use crate::schema::{debts, transactions};
use crate::utils::now_string;

/// Repository for managing debt rows
pub struct DebtRepository {
    pool: Arc<DbPool>,
}

impl DebtRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DebtRepositoryTrait for DebtRepository {
    async fn create(&self, new_debt: NewDebt) -> Result<Debt> {
        self.pool.execute(move |conn| -> Result<Debt> {
            // The parent must be an existing expense transaction
            let parent_type = transactions::table
                .find(&new_debt.parent_expense_id)
                .select(transactions::txn_type)
                .first::<String>(conn)
                .optional()
                .map_err(DebtError::from)?;

            match parent_type.as_deref() {
                None => {
                    return Err(DebtError::InvalidParent(format!(
                        "No transaction with id '{}'",
                        new_debt.parent_expense_id
                    ))
                    .into())
                }
                Some(t) if t != TransactionType::Expense.as_str() => {
                    return Err(DebtError::InvalidParent(format!(
                        "Transaction '{}' is not an expense",
                        new_debt.parent_expense_id
                    ))
                    .into())
                }
                Some(_) => {}
            }

            let mut row: DebtDB = new_debt.into();
            if row.id.is_empty() {
                row.id = Uuid::new_v4().to_string();
            }

            diesel::insert_into(debts::table)
                .values(&row)
                .execute(conn)
                .map_err(DebtError::from)?;

            Ok(row.into())
        })
    }

    async fn set_status(&self, debt_id: &str, status: DebtStatus) -> Result<Debt> {
        let id = debt_id.to_string();
        self.pool.execute(move |conn| -> Result<Debt> {
            diesel::update(debts::table.find(&id))
                .set((
                    debts::status.eq(status.as_str()),
                    debts::updated_at.eq(now_string()),
                ))
                .execute(conn)
                .map_err(DebtError::from)?;

            let row = debts::table
                .find(&id)
                .first::<DebtDB>(conn)
                .map_err(DebtError::from)?;
            Ok(row.into())
        })
    }

    async fn delete(&self, debt_id: &str) -> Result<()> {
        let id = debt_id.to_string();
        self.pool.execute(move |conn| -> Result<()> {
            let affected = diesel::delete(debts::table.find(&id))
                .execute(conn)
                .map_err(DebtError::from)?;
            if affected == 0 {
                return Err(DebtError::NotFound(id.clone()).into());
            }
            Ok(())
        })
    }

    fn get_by_id(&self, debt_id: &str) -> Result<Debt> {
        let mut conn = get_connection(&self.pool)?;
        let row = debts::table
            .find(debt_id)
            .first::<DebtDB>(&mut conn)
            .map_err(DebtError::from)?;
        Ok(row.into())
    }

    fn list(&self) -> Result<Vec<Debt>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = debts::table
            .order(debts::created_at.desc())
            .load::<DebtDB>(&mut conn)
            .map_err(DebtError::from)?;
        Ok(rows.into_iter().map(Debt::from).collect())
    }
}
