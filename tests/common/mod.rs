use std::sync::Arc;
use tempfile::TempDir;

use moneta_core::accounts::{AccountRepository, AccountService};
use moneta_core::categories::{CategoryRepository, CategoryService};
use moneta_core::commands::CommandInterpreter;
use moneta_core::db;
use moneta_core::debts::{DebtRepository, DebtService};
use moneta_core::fx::{FxService, RateProviderGateway, RateStore};
use moneta_core::ledger::{EntitySnapshots, LedgerRepository, LedgerService};

/// A full core wired against a throwaway on-disk database. Consumers go
/// through the service layer, as the shipped callers do.
pub struct TestCore {
    pub accounts: Arc<AccountService>,
    pub categories: Arc<CategoryService>,
    pub fx: Arc<FxService>,
    pub debts: Arc<DebtService>,
    pub ledger: Arc<LedgerService>,
    pub interpreter: CommandInterpreter,
    _dir: TempDir,
}

pub fn setup() -> TestCore {
    setup_with_default_currency("EUR")
}

pub fn setup_with_default_currency(default_currency: &str) -> TestCore {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir
        .path()
        .join("ledger.db")
        .to_str()
        .expect("utf-8 path")
        .to_string();

    let pool = db::create_pool(&db_path).expect("pool");
    db::run_migrations(&pool).expect("migrations");

    let account_repository = Arc::new(AccountRepository::new(pool.clone()));
    let category_repository = Arc::new(CategoryRepository::new(pool.clone()));
    let accounts = Arc::new(AccountService::new(account_repository.clone()));
    let categories = Arc::new(CategoryService::new(category_repository.clone()));
    let rate_store = Arc::new(RateStore::new(pool.clone()));
    // No network providers in tests; rates are injected manually.
    let fx = Arc::new(FxService::new(
        rate_store,
        RateProviderGateway::new(Vec::new()),
    ));
    let ledger_repository = Arc::new(LedgerRepository::new(pool.clone()));
    let lookup = Arc::new(EntitySnapshots::new(
        account_repository,
        category_repository,
    ));
    let debt_repository = Arc::new(DebtRepository::new(pool.clone()));
    let debts = Arc::new(DebtService::new(
        debt_repository,
        ledger_repository.clone(),
        fx.clone(),
    ));
    let ledger = Arc::new(LedgerService::new(
        ledger_repository,
        lookup.clone(),
        fx.clone(),
        debts.clone(),
        default_currency.to_string(),
    ));
    let interpreter = CommandInterpreter::new(ledger.clone(), lookup);

    TestCore {
        accounts,
        categories,
        fx,
        debts,
        ledger,
        interpreter,
        _dir: dir,
    }
}
