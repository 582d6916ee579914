//! Position domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DECIMAL_PRECISION, DEFAULT_ACCOUNT};
use crate::errors::{Error, Result, ValidationError};
use crate::utils::time_utils::flexible_datetime;

/// A lot of shares held in one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub symbol: String,
    pub shares: Decimal,
    pub avg_cost: Decimal,
    pub account: String,
    pub added_date: DateTime<Utc>,
    pub notes: String,
}

/// Input model for creating a new position
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    pub symbol: String,
    pub shares: Decimal,
    pub avg_cost: Decimal,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default, deserialize_with = "flexible_datetime::deserialize_option")]
    pub added_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn validate_amounts(shares: Decimal, avg_cost: Decimal) -> Result<()> {
    if shares <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Shares must be positive, got {}",
            shares
        ))));
    }
    if avg_cost < Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Average cost must be non-negative, got {}",
            avg_cost
        ))));
    }
    Ok(())
}

impl NewPosition {
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "symbol".to_string(),
            )));
        }
        validate_amounts(self.shares, self.avg_cost)
    }

    pub fn into_position(self, id: String) -> Position {
        let account = self
            .account
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());
        Position {
            id,
            symbol: self.symbol.trim().to_uppercase(),
            shares: self.shares,
            avg_cost: self.avg_cost,
            account,
            added_date: self.added_date.unwrap_or_else(Utc::now),
            notes: self.notes.unwrap_or_default(),
        }
    }
}

/// Editable fields of a position.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub shares: Decimal,
    pub avg_cost: Decimal,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PositionUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_amounts(self.shares, self.avg_cost)
    }

    pub fn apply_to(self, mut position: Position) -> Position {
        position.shares = self.shares;
        position.avg_cost = self.avg_cost;
        if let Some(account) = self.account.map(|a| a.trim().to_string()) {
            if !account.is_empty() {
                position.account = account;
            }
        }
        if let Some(notes) = self.notes {
            position.notes = notes;
        }
        position
    }
}

/// All lots of one symbol folded together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPosition {
    pub symbol: String,
    pub shares: Decimal,
    pub cost_basis: Decimal,
    pub avg_cost: Decimal,
    /// Account of the first lot seen for the symbol
    pub account: String,
}

/// Market value of an aggregated position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionValue {
    pub symbol: String,
    pub shares: Decimal,
    pub avg_cost: Decimal,
    pub cost_basis: Decimal,
    /// Latest price, absent when no quote could be fetched
    pub price: Option<Decimal>,
    /// `shares * price`, or the cost basis without a price
    pub market_value: Decimal,
    pub gain: Decimal,
}

impl PositionValue {
    pub fn from_aggregate(position: &AggregatedPosition, price: Option<Decimal>) -> Self {
        let market_value = match price {
            Some(p) => position.shares * p,
            None => position.shares * position.avg_cost,
        };
        PositionValue {
            symbol: position.symbol.clone(),
            shares: position.shares,
            avg_cost: position.avg_cost,
            cost_basis: position.cost_basis,
            price,
            market_value,
            gain: market_value - position.cost_basis,
        }
    }
}

/// Folds lots per symbol, keeping the order symbols first appear in.
pub fn aggregate_positions(positions: &[Position]) -> Vec<AggregatedPosition> {
    let mut aggregated: Vec<AggregatedPosition> = Vec::new();

    for position in positions {
        let cost = position.shares * position.avg_cost;
        match aggregated.iter_mut().find(|a| a.symbol == position.symbol) {
            Some(entry) => {
                entry.shares += position.shares;
                entry.cost_basis += cost;
            }
            None => aggregated.push(AggregatedPosition {
                symbol: position.symbol.clone(),
                shares: position.shares,
                cost_basis: cost,
                avg_cost: Decimal::ZERO,
                account: position.account.clone(),
            }),
        }
    }

    for entry in &mut aggregated {
        entry.avg_cost = if entry.shares.is_zero() {
            Decimal::ZERO
        } else {
            (entry.cost_basis / entry.shares).round_dp(DECIMAL_PRECISION)
        };
    }

    aggregated
}
