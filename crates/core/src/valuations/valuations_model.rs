//! Valuation domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::utils::time_utils::flexible_datetime;
use crate::utils::Month;

/// Which side of the balance sheet a tracked item sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuationKind {
    Asset,
    Liability,
}

impl ValuationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValuationKind::Asset => "asset",
            ValuationKind::Liability => "liability",
        }
    }
}

impl fmt::Display for ValuationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValuationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asset" => Ok(ValuationKind::Asset),
            "liability" => Ok(ValuationKind::Liability),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown valuation kind '{}'",
                other
            )))),
        }
    }
}

/// Domain model representing a recorded valuation of an asset or liability.
///
/// `(kind, name)` identifies the tracked item. `month` is the bucket the
/// point applies from; the snapshot engine forward-fills it until a later
/// point for the same item appears.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPoint {
    pub id: String,
    pub kind: ValuationKind,
    pub name: String,
    pub value: Decimal,
    pub date: DateTime<Utc>,
    pub month: Month,
    #[serde(default)]
    pub desc: String,
}

/// Input model for recording a new valuation
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewValuationPoint {
    pub kind: ValuationKind,
    pub name: String,
    pub value: Decimal,
    #[serde(deserialize_with = "flexible_datetime::deserialize")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub month: Option<Month>,
    #[serde(default)]
    pub desc: Option<String>,
}

impl NewValuationPoint {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if self.value.is_sign_negative() && !self.value.is_zero() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Valuation value must be non-negative, got {}",
                self.value
            ))));
        }
        Ok(())
    }

    /// The month bucket: the explicit one when given, otherwise the UTC month of `date`.
    pub fn effective_month(&self) -> Month {
        self.month
            .unwrap_or_else(|| Month::from_datetime(self.date))
    }

    /// Builds the persisted point with the given identifier.
    pub fn into_point(self, id: String) -> ValuationPoint {
        let month = self.effective_month();
        ValuationPoint {
            id,
            kind: self.kind,
            name: self.name.trim().to_string(),
            value: self.value,
            date: self.date,
            month,
            desc: self.desc.unwrap_or_default(),
        }
    }
}

/// Editable fields of a valuation. The item key and its date are fixed.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ValuationUpdate {
    pub value: Decimal,
    #[serde(default)]
    pub desc: Option<String>,
}

impl ValuationUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.value.is_sign_negative() && !self.value.is_zero() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Valuation value must be non-negative, got {}",
                self.value
            ))));
        }
        Ok(())
    }
}
