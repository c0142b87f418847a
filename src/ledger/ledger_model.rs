use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MONEY_SCALE;
use crate::errors::Result;
use crate::fx::ValuationLine;
use crate::ledger::ledger_errors::LedgerError;
use crate::utils::{format_date, now_string, parse_date, parse_datetime, parse_decimal};

/// Transaction direction. Amounts are stored non-negative; the sign of the
/// balance effect is implied by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "EXPENSE",
            TransactionType::Income => "INCOME",
        }
    }
}

impl From<&str> for TransactionType {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "INCOME" => TransactionType::Income,
            "EXPENSE" => TransactionType::Expense,
            other => {
                log::error!(
                    "Unknown transaction type '{}' in store. Falling back to EXPENSE.",
                    other
                );
                TransactionType::Expense
            }
        }
    }
}

/// Domain model for a committed income or expense transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_name: String,
    pub amount: Decimal,
    pub currency: String,
    pub category_name: String,
    pub txn_type: TransactionType,
    pub txn_date: NaiveDate,
    pub comment: Option<String>,
    pub related_debt_id: Option<String>,
    pub original_default_currency_code: Option<String>,
    pub amount_in_original_default: Option<Decimal>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    /// Balance effect on the owning account.
    pub fn signed_amount(&self) -> Decimal {
        match self.txn_type {
            TransactionType::Expense => -self.amount,
            TransactionType::Income => self.amount,
        }
    }

    /// View of this transaction for total computation.
    pub fn valuation_line(&self) -> ValuationLine {
        ValuationLine {
            amount: self.amount,
            currency: self.currency.clone(),
            date: self.txn_date,
            snapshot_currency: self.original_default_currency_code.clone(),
            snapshot_amount: self.amount_in_original_default,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub account_name: String,
    pub amount: Decimal,
    pub currency: String,
    pub category_name: String,
    pub txn_type: TransactionType,
    pub txn_date: NaiveDate,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub related_debt_id: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub id: String,
    pub account_name: String,
    pub amount: Decimal,
    pub currency: String,
    pub category_name: String,
    pub txn_type: TransactionType,
    pub txn_date: NaiveDate,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub related_debt_id: Option<String>,
}

impl TransactionUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        Ok(())
    }
}

/// Domain model for a committed transfer between two accounts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: String,
    pub source_account: String,
    pub destination_account: String,
    pub amount: Decimal,
    pub currency: String,
    pub txn_date: NaiveDate,
    pub comment: Option<String>,
    pub destination_amount: Option<Decimal>,
    pub destination_currency: Option<String>,
    pub original_default_currency_code: Option<String>,
    pub amount_in_original_default: Option<Decimal>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Transfer {
    /// Amount credited to the destination account.
    pub fn credited_amount(&self) -> Decimal {
        self.destination_amount.unwrap_or(self.amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransfer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source_account: String,
    pub destination_account: String,
    pub amount: Decimal,
    pub currency: String,
    pub txn_date: NaiveDate,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub destination_amount: Option<Decimal>,
    #[serde(default)]
    pub destination_currency: Option<String>,
}

impl NewTransfer {
    pub fn validate(&self) -> Result<()> {
        validate_transfer_fields(
            &self.source_account,
            &self.destination_account,
            self.amount,
            self.destination_amount,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferUpdate {
    pub id: String,
    pub source_account: String,
    pub destination_account: String,
    pub amount: Decimal,
    pub currency: String,
    pub txn_date: NaiveDate,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub destination_amount: Option<Decimal>,
    #[serde(default)]
    pub destination_currency: Option<String>,
}

impl TransferUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_transfer_fields(
            &self.source_account,
            &self.destination_account,
            self.amount,
            self.destination_amount,
        )
    }
}

/// Value of a record in the default currency, captured at commit time.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationSnapshot {
    pub currency_code: String,
    pub amount: Decimal,
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "Amount must be non-negative, got {}",
            amount
        ))
        .into());
    }
    Ok(())
}

fn validate_transfer_fields(
    source: &str,
    destination: &str,
    amount: Decimal,
    destination_amount: Option<Decimal>,
) -> Result<()> {
    validate_amount(amount)?;
    if let Some(credit) = destination_amount {
        validate_amount(credit)?;
    }
    if source.eq_ignore_ascii_case(destination) {
        return Err(LedgerError::SameAccountTransfer(source.to_string()).into());
    }
    Ok(())
}

/// Database model for transactions
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub account_name: String,
    pub amount: String,
    pub currency: String,
    pub category_name: String,
    pub txn_type: String,
    pub txn_date: String,
    pub comment: Option<String>,
    pub related_debt_id: Option<String>,
    pub original_default_currency_code: Option<String>,
    pub amount_in_original_default: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            amount: parse_decimal(&db.amount, "amount"),
            txn_type: TransactionType::from(db.txn_type.as_str()),
            txn_date: parse_date(&db.txn_date, "txn_date"),
            amount_in_original_default: db
                .amount_in_original_default
                .as_deref()
                .map(|v| parse_decimal(v, "amount_in_original_default")),
            created_at: parse_datetime(&db.created_at, "created_at"),
            updated_at: parse_datetime(&db.updated_at, "updated_at"),
            id: db.id,
            account_name: db.account_name,
            currency: db.currency,
            category_name: db.category_name,
            comment: db.comment,
            related_debt_id: db.related_debt_id,
            original_default_currency_code: db.original_default_currency_code,
        }
    }
}

impl From<NewTransaction> for TransactionDB {
    fn from(domain: NewTransaction) -> Self {
        let now = now_string();
        Self {
            id: domain.id.unwrap_or_default(),
            account_name: domain.account_name,
            amount: domain.amount.round_dp(MONEY_SCALE).to_string(),
            currency: domain.currency,
            category_name: domain.category_name,
            txn_type: domain.txn_type.as_str().to_string(),
            txn_date: format_date(domain.txn_date),
            comment: domain.comment,
            related_debt_id: domain.related_debt_id,
            original_default_currency_code: None,
            amount_in_original_default: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl From<TransactionUpdate> for TransactionDB {
    fn from(domain: TransactionUpdate) -> Self {
        let now = now_string();
        Self {
            id: domain.id,
            account_name: domain.account_name,
            amount: domain.amount.round_dp(MONEY_SCALE).to_string(),
            currency: domain.currency,
            category_name: domain.category_name,
            txn_type: domain.txn_type.as_str().to_string(),
            txn_date: format_date(domain.txn_date),
            comment: domain.comment,
            related_debt_id: domain.related_debt_id,
            original_default_currency_code: None,
            amount_in_original_default: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Database model for transfers
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::transfers)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransferDB {
    pub id: String,
    pub source_account: String,
    pub destination_account: String,
    pub amount: String,
    pub currency: String,
    pub txn_date: String,
    pub comment: Option<String>,
    pub destination_amount: Option<String>,
    pub destination_currency: Option<String>,
    pub original_default_currency_code: Option<String>,
    pub amount_in_original_default: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TransferDB> for Transfer {
    fn from(db: TransferDB) -> Self {
        Self {
            amount: parse_decimal(&db.amount, "amount"),
            txn_date: parse_date(&db.txn_date, "txn_date"),
            destination_amount: db
                .destination_amount
                .as_deref()
                .map(|v| parse_decimal(v, "destination_amount")),
            amount_in_original_default: db
                .amount_in_original_default
                .as_deref()
                .map(|v| parse_decimal(v, "amount_in_original_default")),
            created_at: parse_datetime(&db.created_at, "created_at"),
            updated_at: parse_datetime(&db.updated_at, "updated_at"),
            id: db.id,
            source_account: db.source_account,
            destination_account: db.destination_account,
            currency: db.currency,
            comment: db.comment,
            destination_currency: db.destination_currency,
            original_default_currency_code: db.original_default_currency_code,
        }
    }
}

impl From<NewTransfer> for TransferDB {
    fn from(domain: NewTransfer) -> Self {
        let now = now_string();
        Self {
            id: domain.id.unwrap_or_default(),
            source_account: domain.source_account,
            destination_account: domain.destination_account,
            amount: domain.amount.round_dp(MONEY_SCALE).to_string(),
            currency: domain.currency,
            txn_date: format_date(domain.txn_date),
            comment: domain.comment,
            destination_amount: domain
                .destination_amount
                .map(|d| d.round_dp(MONEY_SCALE).to_string()),
            destination_currency: domain.destination_currency,
            original_default_currency_code: None,
            amount_in_original_default: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl From<TransferUpdate> for TransferDB {
    fn from(domain: TransferUpdate) -> Self {
        let now = now_string();
        Self {
            id: domain.id,
            source_account: domain.source_account,
            destination_account: domain.destination_account,
            amount: domain.amount.round_dp(MONEY_SCALE).to_string(),
            currency: domain.currency,
            txn_date: format_date(domain.txn_date),
            comment: domain.comment,
            destination_amount: domain
                .destination_amount
                .map(|d| d.round_dp(MONEY_SCALE).to_string()),
            destination_currency: domain.destination_currency,
            original_default_currency_code: None,
            amount_in_original_default: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
