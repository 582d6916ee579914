//! Database model for positions.

use diesel::prelude::*;
use worthline_core::positions::Position;

use crate::errors::StorageError;
use crate::utils::{datetime_to_text, decimal_to_text, text_to_datetime, text_to_decimal};

#[derive(
    Queryable, Selectable, Insertable, Identifiable, AsChangeset, Debug, Clone, PartialEq,
)]
#[diesel(table_name = crate::schema::positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PositionDB {
    pub id: String,
    pub symbol: String,
    pub shares: String,
    pub avg_cost: String,
    pub account: String,
    pub added_date: String,
    pub notes: String,
}

impl TryFrom<PositionDB> for Position {
    type Error = StorageError;

    fn try_from(db: PositionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            shares: text_to_decimal("shares", &db.shares)?,
            avg_cost: text_to_decimal("avg_cost", &db.avg_cost)?,
            added_date: text_to_datetime("added_date", &db.added_date)?,
            id: db.id,
            symbol: db.symbol,
            account: db.account,
            notes: db.notes,
        })
    }
}

impl From<Position> for PositionDB {
    fn from(domain: Position) -> Self {
        Self {
            id: domain.id,
            symbol: domain.symbol,
            shares: decimal_to_text(domain.shares),
            avg_cost: decimal_to_text(domain.avg_cost),
            account: domain.account,
            added_date: datetime_to_text(domain.added_date),
            notes: domain.notes,
        }
    }
}
