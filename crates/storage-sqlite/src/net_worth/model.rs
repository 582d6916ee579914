//! Database model for cached monthly snapshots.

use diesel::prelude::*;
use worthline_core::net_worth::MonthlySnapshot;

use crate::errors::StorageError;
use crate::utils::{decimal_to_text, text_to_decimal, text_to_month};

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::net_worth_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SnapshotDB {
    pub month: String,
    pub assets: String,
    pub liabilities: String,
    pub net_worth: String,
    pub base_assets: Option<String>,
    pub positions_value: Option<String>,
}

impl TryFrom<SnapshotDB> for MonthlySnapshot {
    type Error = StorageError;

    fn try_from(db: SnapshotDB) -> Result<Self, Self::Error> {
        Ok(Self {
            date: text_to_month("month", &db.month)?,
            assets: text_to_decimal("assets", &db.assets)?,
            liabilities: text_to_decimal("liabilities", &db.liabilities)?,
            net_worth: text_to_decimal("net_worth", &db.net_worth)?,
            base_assets: db
                .base_assets
                .as_deref()
                .map(|text| text_to_decimal("base_assets", text))
                .transpose()?,
            positions_value: db
                .positions_value
                .as_deref()
                .map(|text| text_to_decimal("positions_value", text))
                .transpose()?,
        })
    }
}

impl From<MonthlySnapshot> for SnapshotDB {
    fn from(domain: MonthlySnapshot) -> Self {
        Self {
            month: domain.date.to_string(),
            assets: decimal_to_text(domain.assets),
            liabilities: decimal_to_text(domain.liabilities),
            net_worth: decimal_to_text(domain.net_worth),
            base_assets: domain.base_assets.map(decimal_to_text),
            positions_value: domain.positions_value.map(decimal_to_text),
        }
    }
}
