//! Database models for transactions and categories.

use diesel::prelude::*;
use worthline_core::transactions::{Category, Transaction};

use crate::errors::StorageError;
use crate::utils::{datetime_to_text, decimal_to_text, text_to_datetime, text_to_decimal};

#[derive(
    Queryable, Selectable, Insertable, Identifiable, AsChangeset, Debug, Clone, PartialEq,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub date: String,
    pub amount: String,
    pub description: String,
    pub category: String,
    pub account: String,
    pub notes: String,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CategoryDB {
    pub id: String,
    pub name: String,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = StorageError;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            date: text_to_datetime("date", &db.date)?,
            amount: text_to_decimal("amount", &db.amount)?,
            id: db.id,
            description: db.description,
            category: db.category,
            account: db.account,
            notes: db.notes,
        })
    }
}

impl From<Transaction> for TransactionDB {
    fn from(domain: Transaction) -> Self {
        Self {
            id: domain.id,
            date: datetime_to_text(domain.date),
            amount: decimal_to_text(domain.amount),
            description: domain.description,
            category: domain.category,
            account: domain.account,
            notes: domain.notes,
        }
    }
}

impl From<CategoryDB> for Category {
    fn from(db: CategoryDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
        }
    }
}
