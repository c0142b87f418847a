use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::TransactionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Account,
    Category,
}

/// A parsed entity name that matched no existing account or category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedEntity {
    pub kind: EntityKind,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    pub txn_type: TransactionType,
    pub account_name: String,
    pub category_name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransfer {
    pub source_account: String,
    pub destination_account: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Tagged union over the two committable command shapes. Always carried as a
/// return value, never as shared mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParsedCommand {
    Transaction(ParsedTransaction),
    Transfer(ParsedTransfer),
}

/// Everything the caller needs to route the user to manual resolution:
/// the fully parsed command plus the names that failed to resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisambiguationPayload {
    pub command: ParsedCommand,
    pub unresolved: Vec<UnresolvedEntity>,
}

/// Terminal outcome of interpreting one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum CommandOutcome {
    Committed { summary: String },
    DisambiguationRequested(DisambiguationPayload),
    Unrecognized { guidance: String },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}
