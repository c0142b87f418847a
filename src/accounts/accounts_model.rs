use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MONEY_SCALE;
use crate::errors::{Error, Result, ValidationError};
use crate::utils::{now_string, parse_datetime, parse_decimal};

/// Domain model representing a money account
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub balance: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub currency: String,
    #[serde(default)]
    pub balance: Option<Decimal>,
}

impl NewAccount {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Currency cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}

/// Database model for accounts
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub balance: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            balance: parse_decimal(&db.balance, "balance"),
            created_at: parse_datetime(&db.created_at, "created_at"),
            updated_at: parse_datetime(&db.updated_at, "updated_at"),
            id: db.id,
            name: db.name,
            currency: db.currency,
        }
    }
}

impl From<NewAccount> for AccountDB {
    fn from(domain: NewAccount) -> Self {
        let now = now_string();
        Self {
            id: domain.id.unwrap_or_default(),
            name: domain.name,
            currency: domain.currency,
            balance: domain
                .balance
                .unwrap_or(Decimal::ZERO)
                .round_dp(MONEY_SCALE)
                .to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
