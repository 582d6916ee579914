//! Calendar month value type.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{Error, ValidationError};

// =============================================================================
// Month
// =============================================================================

/// A calendar month bucket (year + month).
///
/// Snapshots, valuation points and transaction buckets are all keyed by
/// `Month`. Ordering is chronological. On the wire a month is the first day
/// of the month, `YYYY-MM-01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Creates a month. Returns None unless `month` is within 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Month bucket of a UTC instant.
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self::from_date(instant.date_naive())
    }

    /// The current month in UTC.
    pub fn current() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        // year/month are validated on construction, day 1 always exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.succ()
            .first_day()
            .pred_opt()
            .unwrap_or_else(|| self.first_day())
    }

    /// The following month.
    pub fn succ(&self) -> Self {
        self.add_months(1)
    }

    /// Shifts by `delta` months (negative moves backwards).
    pub fn add_months(&self, delta: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + delta;
        Self {
            year: index.div_euclid(12),
            month: (index.rem_euclid(12) + 1) as u32,
        }
    }

    /// Number of months from `self` to `other` (negative when `other` is earlier).
    pub fn months_until(&self, other: Month) -> i32 {
        (other.year - self.year) * 12 + (other.month as i32 - self.month as i32)
    }

    /// January of the same year.
    pub fn start_of_year(&self) -> Self {
        Self {
            year: self.year,
            month: 1,
        }
    }

    /// Iterates every month from `self` through `end`, inclusive.
    /// Yields nothing when `end` precedes `self`.
    pub fn iter_through(self, end: Month) -> impl Iterator<Item = Month> {
        let count = self.months_until(end).max(-1) + 1;
        (0..count).map(move |offset| self.add_months(offset))
    }

    /// Parses `YYYY-MM` or `YYYY-MM-DD` (the day is ignored).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let mut parts = value.splitn(3, '-');
        let year = parts.next()?.parse::<i32>().ok()?;
        let month = parts.next()?.parse::<u32>().ok()?;
        if let Some(day) = parts.next() {
            // Validate the full date when a day is present
            let day = day.get(..2).unwrap_or(day).parse::<u32>().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)?;
        }
        Self::new(year, month)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-01", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::parse(s).ok_or_else(|| {
            Error::Validation(ValidationError::InvalidInput(format!(
                "Invalid month '{}', expected YYYY-MM or YYYY-MM-DD",
                s
            )))
        })
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl From<DateTime<Utc>> for Month {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::from_datetime(instant)
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Month::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid month: {}", raw)))
    }
}
