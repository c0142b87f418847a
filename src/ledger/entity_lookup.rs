use std::sync::Arc;

use super::ledger_traits::EntityLookupTrait;
use crate::accounts::{Account, AccountRepositoryTrait};
use crate::categories::{Category, CategoryRepositoryTrait};
use crate::errors::Result;

/// Snapshot lookup backed by the account and category repositories.
pub struct EntitySnapshots {
    accounts: Arc<dyn AccountRepositoryTrait>,
    categories: Arc<dyn CategoryRepositoryTrait>,
}

impl EntitySnapshots {
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        categories: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        Self {
            accounts,
            categories,
        }
    }
}

impl EntityLookupTrait for EntitySnapshots {
    fn current_accounts(&self) -> Result<Vec<Account>> {
        self.accounts.list()
    }

    fn current_categories(&self) -> Result<Vec<Category>> {
        self.categories.list()
    }
}
