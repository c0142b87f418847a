pub(crate) mod debts_errors;
pub(crate) mod debts_model;
pub(crate) mod debts_repository;
pub(crate) mod debts_service;
pub(crate) mod debts_traits;

pub use debts_errors::DebtError;
pub use debts_model::{Debt, DebtDB, DebtStatus, NewDebt};
pub use debts_repository::DebtRepository;
pub use debts_service::DebtService;
pub use debts_traits::{DebtRepositoryTrait, DebtServiceTrait};
