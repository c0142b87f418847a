use log::debug;
use std::sync::Arc;

use super::accounts_model::{Account, NewAccount};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::errors::Result;

/// Service for managing accounts
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        debug!(
            "Creating account '{}' ({})",
            new_account.name, new_account.currency
        );
        self.repository.create(new_account).await
    }

    /// Deletes an account; refused while any transaction or transfer references it.
    async fn delete_account(&self, account_id: &str) -> Result<()> {
        self.repository.delete(account_id).await
    }

    fn get_account(&self, account_id: &str) -> Result<Account> {
        self.repository.get_by_id(account_id)
    }

    fn get_account_by_name(&self, name: &str) -> Result<Option<Account>> {
        self.repository.get_by_name(name)
    }

    fn get_all_accounts(&self) -> Result<Vec<Account>> {
        self.repository.list()
    }
}
