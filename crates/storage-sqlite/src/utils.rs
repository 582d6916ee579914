//! TEXT column codecs.
//!
//! Decimals are stored in their exact string form and timestamps as RFC 3339
//! with a `Z` suffix, so lexical order on `date` columns is chronological.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use worthline_core::utils::Month;

use crate::errors::StorageError;

pub fn decimal_to_text(value: Decimal) -> String {
    value.normalize().to_string()
}

pub fn text_to_decimal(column: &str, text: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(text)
        .map_err(|e| StorageError::Decode(format!("{} '{}': {}", column, text, e)))
}

pub fn datetime_to_text(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn text_to_datetime(column: &str, text: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Decode(format!("{} '{}': {}", column, text, e)))
}

pub fn text_to_month(column: &str, text: &str) -> Result<Month, StorageError> {
    Month::parse(text).ok_or_else(|| StorageError::Decode(format!("{} '{}'", column, text)))
}
