pub(crate) mod entity_lookup;
pub(crate) mod ledger_errors;
pub(crate) mod ledger_model;
pub(crate) mod ledger_repository;
pub(crate) mod ledger_service;
pub(crate) mod ledger_traits;

pub use entity_lookup::EntitySnapshots;
pub use ledger_errors::LedgerError;
pub use ledger_model::{
    NewTransaction, NewTransfer, Transaction, TransactionDB, TransactionType, TransactionUpdate,
    Transfer, TransferDB, TransferUpdate, ValuationSnapshot,
};
pub use ledger_repository::LedgerRepository;
pub use ledger_service::LedgerService;
pub use ledger_traits::{EntityLookupTrait, LedgerRepositoryTrait, LedgerServiceTrait};
