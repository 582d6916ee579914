//! Net worth domain models.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::Month;

/// One month of the reconstructed balance sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySnapshot {
    /// Month bucket, unique across a series
    pub date: Month,
    /// Asset valuations in effect plus cumulative transactions (plus positions when enriched)
    pub assets: Decimal,
    /// Liability valuations in effect (positive magnitude)
    pub liabilities: Decimal,
    pub net_worth: Decimal,
    /// Assets before the positions overlay, frozen on first enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_assets: Option<Decimal>,
    /// Market value of stock positions added by the overlay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions_value: Option<Decimal>,
}

impl MonthlySnapshot {
    pub fn new(date: Month, assets: Decimal, liabilities: Decimal) -> Self {
        Self {
            date,
            assets,
            liabilities,
            net_worth: assets - liabilities,
            base_assets: None,
            positions_value: None,
        }
    }

    /// Sets the positions value on top of the frozen base assets.
    ///
    /// The first call records the current `assets` as `base_assets`; later
    /// calls reuse it, so applying the same value again changes nothing.
    pub fn apply_positions_value(&mut self, positions_value: Decimal) {
        let base = *self.base_assets.get_or_insert(self.assets);
        self.positions_value = Some(positions_value);
        self.assets = base + positions_value;
        self.net_worth = self.assets - self.liabilities;
    }
}

/// Time window for a snapshot series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapshotRange {
    #[serde(rename = "3m")]
    ThreeMonths,
    #[default]
    #[serde(rename = "12m")]
    TwelveMonths,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "all")]
    All,
}

impl SnapshotRange {
    /// Parses `3m`, `12m`, `ytd` or `all`. Anything else is `12m`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "3m" => SnapshotRange::ThreeMonths,
            "ytd" => SnapshotRange::YearToDate,
            "all" => SnapshotRange::All,
            _ => SnapshotRange::TwelveMonths,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotRange::ThreeMonths => "3m",
            SnapshotRange::TwelveMonths => "12m",
            SnapshotRange::YearToDate => "ytd",
            SnapshotRange::All => "all",
        }
    }

    /// First month kept when the series is viewed in `current`.
    /// `3m` and `12m` keep that many months ending at `current`.
    pub fn cutoff(&self, current: Month) -> Option<Month> {
        match self {
            SnapshotRange::ThreeMonths => Some(current.add_months(-2)),
            SnapshotRange::TwelveMonths => Some(current.add_months(-11)),
            SnapshotRange::YearToDate => Some(current.start_of_year()),
            SnapshotRange::All => None,
        }
    }
}

impl fmt::Display for SnapshotRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headline numbers from the latest snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthSummary {
    pub as_of: Option<Month>,
    pub assets: Decimal,
    pub liabilities: Decimal,
    pub net_worth: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions_value: Option<Decimal>,
}

impl From<&MonthlySnapshot> for NetWorthSummary {
    fn from(snapshot: &MonthlySnapshot) -> Self {
        NetWorthSummary {
            as_of: Some(snapshot.date),
            assets: snapshot.assets,
            liabilities: snapshot.liabilities,
            net_worth: snapshot.net_worth,
            positions_value: snapshot.positions_value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityItemType {
    Valuation,
    Transaction,
}

/// Entry of the recent activity feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFeedItem {
    pub item_type: ActivityItemType,
    pub id: String,
    /// Valuation name or transaction description
    pub name: String,
    pub value: Decimal,
    pub date: DateTime<Utc>,
    /// `asset`/`liability` for valuations, `income`/`expense` for transactions
    pub label: String,
}
