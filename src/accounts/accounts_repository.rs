use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::accounts::accounts_errors::AccountError;
use crate::accounts::accounts_model::{Account, AccountDB, NewAccount};
use crate::accounts::accounts_traits::AccountRepositoryTrait;
use crate::db::{get_connection, DbPool, DbTransactionExecutor};
use crate::errors::Result;
use crate::schema::{accounts, transactions, transfers};

/// Repository for managing account rows
pub struct AccountRepository {
    pool: Arc<DbPool>,
}

impl AccountRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;

        self.pool.execute(|conn| -> Result<Account> {
            // Name uniqueness is case-insensitive (NOCASE collation)
            let existing = accounts::table
                .filter(accounts::name.eq(&new_account.name))
                .first::<AccountDB>(conn)
                .optional()
                .map_err(AccountError::from)?;

            if existing.is_some() {
                return Err(AccountError::DuplicateName(new_account.name.clone()).into());
            }

            let mut account_db: AccountDB = new_account.into();
            account_db.id = Uuid::new_v4().to_string();

            diesel::insert_into(accounts::table)
                .values(&account_db)
                .execute(conn)
                .map_err(AccountError::from)?;

            Ok(account_db.into())
        })
    }

    async fn delete(&self, account_id: &str) -> Result<()> {
        let id_owned = account_id.to_string();
        self.pool.execute(move |conn| -> Result<()> {
            let account = accounts::table
                .find(&id_owned)
                .first::<AccountDB>(conn)
                .map_err(AccountError::from)?;

            let txn_count: i64 = transactions::table
                .filter(transactions::account_name.eq(&account.name))
                .count()
                .get_result(conn)
                .map_err(AccountError::from)?;

            let transfer_count: i64 = transfers::table
                .filter(
                    transfers::source_account
                        .eq(&account.name)
                        .or(transfers::destination_account.eq(&account.name)),
                )
                .count()
                .get_result(conn)
                .map_err(AccountError::from)?;

            if txn_count > 0 || transfer_count > 0 {
                return Err(AccountError::HasDependents(account.name).into());
            }

            diesel::delete(accounts::table.find(&id_owned))
                .execute(conn)
                .map_err(AccountError::from)?;

            Ok(())
        })
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;
        let account = accounts::table
            .find(account_id)
            .first::<AccountDB>(&mut conn)
            .map_err(AccountError::from)?;
        Ok(account.into())
    }

    fn get_by_name(&self, name: &str) -> Result<Option<Account>> {
        let mut conn = get_connection(&self.pool)?;
        let account = accounts::table
            .filter(accounts::name.eq(name))
            .first::<AccountDB>(&mut conn)
            .optional()
            .map_err(AccountError::from)?;
        Ok(account.map(Account::from))
    }

    fn list(&self) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = accounts::table
            .order(accounts::name.asc())
            .load::<AccountDB>(&mut conn)
            .map_err(AccountError::from)?;
        Ok(rows.into_iter().map(Account::from).collect())
    }
}
