pub mod accounts;
pub mod categories;
pub mod commands;
pub mod constants;
pub mod db;
pub mod debts;
pub mod errors;
pub mod fx;
pub mod ledger;
pub mod schema;
pub(crate) mod utils;

pub use errors::{Error, Result};
