//! Transaction domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ACCOUNT, DEFAULT_CATEGORY};
use crate::errors::{Error, Result, ValidationError};
use crate::utils::time_utils::flexible_datetime;
use crate::utils::Month;

/// A dated cash flow. Positive amounts are income, negative amounts expenses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub account: String,
    pub notes: String,
}

impl Transaction {
    /// UTC month the transaction is bucketed into.
    pub fn month(&self) -> Month {
        Month::from_datetime(self.date)
    }

    pub fn is_income(&self) -> bool {
        self.amount >= Decimal::ZERO
    }
}

/// Input model for creating a new transaction
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(deserialize_with = "flexible_datetime::deserialize")]
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Trims the value and substitutes `default` when nothing remains.
fn or_default(value: Option<String>, default: &str) -> String {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

impl NewTransaction {
    /// Builds the persisted transaction, filling metadata defaults.
    pub fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            date: self.date,
            amount: self.amount,
            description: or_default(self.description, ""),
            category: or_default(self.category, DEFAULT_CATEGORY),
            account: or_default(self.account, DEFAULT_ACCOUNT),
            notes: or_default(self.notes, ""),
        }
    }
}

/// Editable fields of a transaction. Omitted metadata keeps its value.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TransactionUpdate {
    /// Applies the update onto an existing transaction.
    pub fn apply_to(self, mut transaction: Transaction) -> Transaction {
        transaction.amount = self.amount;
        if let Some(description) = self.description {
            transaction.description = description.trim().to_string();
        }
        if let Some(category) = self.category {
            transaction.category = or_default(Some(category), DEFAULT_CATEGORY);
        }
        if let Some(account) = self.account {
            transaction.account = or_default(Some(account), DEFAULT_ACCOUNT);
        }
        if let Some(notes) = self.notes {
            transaction.notes = notes.trim().to_string();
        }
        transaction
    }
}

/// A transaction category. Names are unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn validate_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        Ok(trimmed.to_string())
    }
}

/// Listing filter for transactions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    /// Case-insensitive substring over description, notes and account.
    #[serde(default)]
    pub search: Option<String>,
    /// Exact category match.
    #[serde(default)]
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let hit = [
                &transaction.description,
                &transaction.notes,
                &transaction.account,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        match self.category.as_deref().filter(|c| !c.is_empty()) {
            Some(category) => transaction.category == category,
            None => true,
        }
    }
}
