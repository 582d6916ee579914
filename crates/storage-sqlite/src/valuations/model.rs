//! Database model for valuation points.

use std::str::FromStr;

use diesel::prelude::*;
use worthline_core::valuations::{ValuationKind, ValuationPoint};

use crate::errors::StorageError;
use crate::utils::{
    datetime_to_text, decimal_to_text, text_to_datetime, text_to_decimal, text_to_month,
};

#[derive(Queryable, Selectable, Insertable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::valuations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ValuationDB {
    pub id: String,
    pub kind: String,
    pub name: String,
    pub value: String,
    pub date: String,
    pub month: String,
    pub description: String,
}

impl TryFrom<ValuationDB> for ValuationPoint {
    type Error = StorageError;

    fn try_from(db: ValuationDB) -> Result<Self, Self::Error> {
        let kind = ValuationKind::from_str(&db.kind)
            .map_err(|e| StorageError::Decode(format!("kind '{}': {}", db.kind, e)))?;
        Ok(Self {
            kind,
            value: text_to_decimal("value", &db.value)?,
            date: text_to_datetime("date", &db.date)?,
            month: text_to_month("month", &db.month)?,
            id: db.id,
            name: db.name,
            desc: db.description,
        })
    }
}

impl From<ValuationPoint> for ValuationDB {
    fn from(domain: ValuationPoint) -> Self {
        Self {
            id: domain.id,
            kind: domain.kind.as_str().to_string(),
            name: domain.name,
            value: decimal_to_text(domain.value),
            date: datetime_to_text(domain.date),
            month: domain.month.to_string(),
            description: domain.desc,
        }
    }
}
