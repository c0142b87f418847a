use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::{now_string, parse_datetime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DebtStatus {
    Open,
    Closed,
}

impl DebtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtStatus::Open => "OPEN",
            DebtStatus::Closed => "CLOSED",
        }
    }
}

impl From<&str> for DebtStatus {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "CLOSED" => DebtStatus::Closed,
            "OPEN" => DebtStatus::Open,
            other => {
                log::error!("Unknown debt status '{}' in store. Falling back to OPEN.", other);
                DebtStatus::Open
            }
        }
    }
}

/// Domain model for a debt tracked against a parent expense
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: String,
    pub parent_expense_id: String,
    pub status: DebtStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDebt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub parent_expense_id: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Database model for debts
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::debts)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DebtDB {
    pub id: String,
    pub parent_expense_id: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DebtDB> for Debt {
    fn from(db: DebtDB) -> Self {
        Self {
            status: DebtStatus::from(db.status.as_str()),
            created_at: parse_datetime(&db.created_at, "created_at"),
            updated_at: parse_datetime(&db.updated_at, "updated_at"),
            id: db.id,
            parent_expense_id: db.parent_expense_id,
            notes: db.notes,
        }
    }
}

impl From<NewDebt> for DebtDB {
    fn from(domain: NewDebt) -> Self {
        let now = now_string();
        Self {
            id: domain.id.unwrap_or_default(),
            parent_expense_id: domain.parent_expense_id,
            status: DebtStatus::Open.as_str().to_string(),
            notes: domain.notes,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
