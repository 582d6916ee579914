use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use super::month::Month;
use crate::errors::{Error, Result, ValidationError};

pub fn get_months_between(start: Month, end: Month) -> Vec<Month> {
    start.iter_through(end).collect()
}

/// Midnight UTC on the first day of `month`.
pub fn month_start_utc(month: Month) -> DateTime<Utc> {
    Utc.from_utc_datetime(&month.first_day().and_time(NaiveTime::MIN))
}

/// Last second (UTC) of the last day of `month`.
pub fn month_end_utc(month: Month) -> DateTime<Utc> {
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&month.last_day().and_time(end_of_day))
}

lazy_static! {
    /// `M/D/YYYY`, `MM/DD/YYYY` and `MM/DD/YY`
    static ref SLASH_DATE_REGEX: Regex =
        Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})$").expect("Invalid regex pattern");
}

fn invalid_date(input: &str) -> Error {
    Error::Validation(ValidationError::InvalidInput(format!(
        "Unrecognized date '{}'",
        input
    )))
}

/// Normalizes a user supplied date to a UTC instant.
///
/// Accepted, in order:
/// - `YYYY-MM-DD` (midnight UTC)
/// - `MM/DD/YYYY`, `M/D/YYYY` and `MM/DD/YY` (two-digit years are 20YY)
/// - RFC 3339 (`2024-01-15T10:00:00Z`, `2024-01-15T10:00:00-05:00`)
/// - naive `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD HH:MM:SS`, read as UTC
pub fn parse_date_input(input: &str) -> Result<DateTime<Utc>> {
    let value = input.trim();
    if value.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "date".to_string(),
        )));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }

    if let Some(caps) = SLASH_DATE_REGEX.captures(value) {
        let month: u32 = caps[1].parse().map_err(|_| invalid_date(value))?;
        let day: u32 = caps[2].parse().map_err(|_| invalid_date(value))?;
        let year_raw = &caps[3];
        let mut year: i32 = year_raw.parse().map_err(|_| invalid_date(value))?;
        if year_raw.len() == 2 {
            year += 2000;
        }
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid_date(value))?;
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(invalid_date(value))
}

/// Serde helpers accepting any format understood by [`parse_date_input`].
///
/// Use with `#[serde(deserialize_with = "flexible_datetime::deserialize")]`
/// on `DateTime<Utc>` fields, or `flexible_datetime::deserialize_option`
/// together with `#[serde(default)]` on `Option<DateTime<Utc>>` fields.
pub mod flexible_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    use super::parse_date_input;

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date_input(&raw).map_err(serde::de::Error::custom)
    }

    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => parse_date_input(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
