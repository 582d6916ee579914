//! Positions overlay for snapshot series.
//!
//! Both overlays go through [`MonthlySnapshot::apply_positions_value`], so the
//! valuation-derived assets are kept in `base_assets` and running an overlay
//! twice gives the same series. Quote failures fall back to average cost.

use std::cmp::Reverse;

use log::debug;
use rust_decimal::Decimal;

use super::net_worth_model::MonthlySnapshot;
use crate::constants::MAX_HISTORY_POSITIONS;
use crate::positions::{aggregate_positions, AggregatedPosition, Position};
use crate::quotes::QuoteServiceTrait;

/// Values the largest positions at every snapshot month.
///
/// Picks up to twelve aggregated positions by cost basis and prices each
/// month with that month's close, or the average cost when no close exists.
pub async fn apply_history_overlay(
    snapshots: &mut [MonthlySnapshot],
    positions: &[AggregatedPosition],
    quote_service: &dyn QuoteServiceTrait,
) {
    let (start, end) = match (snapshots.first(), snapshots.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return,
    };
    if positions.is_empty() {
        return;
    }

    let mut top: Vec<&AggregatedPosition> = positions.iter().collect();
    top.sort_by_key(|p| Reverse(p.cost_basis));
    top.truncate(MAX_HISTORY_POSITIONS);

    let symbols: Vec<String> = top.iter().map(|p| p.symbol.clone()).collect();
    let closes = quote_service
        .get_monthly_closes_batch(&symbols, start, end)
        .await;

    for snapshot in snapshots.iter_mut() {
        let positions_value: Decimal = top
            .iter()
            .map(|p| {
                let price = closes
                    .get(&p.symbol)
                    .and_then(|series| series.get(&snapshot.date))
                    .copied()
                    .unwrap_or(p.avg_cost);
                p.shares * price
            })
            .sum();
        snapshot.apply_positions_value(positions_value);
    }

    debug!(
        "Applied history overlay for {} symbols over {} snapshots",
        top.len(),
        snapshots.len()
    );
}

/// Values every position lot at the latest quote on the last snapshot.
pub async fn apply_latest_overlay(
    snapshots: &mut [MonthlySnapshot],
    positions: &[Position],
    quote_service: &dyn QuoteServiceTrait,
) {
    let latest = match snapshots.last_mut() {
        Some(latest) => latest,
        None => return,
    };
    if positions.is_empty() {
        return;
    }

    let symbols: Vec<String> = aggregate_positions(positions)
        .into_iter()
        .map(|a| a.symbol)
        .collect();
    let prices = quote_service.get_latest_prices(&symbols).await;

    let positions_value: Decimal = positions
        .iter()
        .map(|p| p.shares * prices.get(&p.symbol).copied().unwrap_or(p.avg_cost))
        .sum();
    latest.apply_positions_value(positions_value);

    debug!(
        "Applied latest overlay to {}: {} priced of {} symbols",
        latest.date,
        prices.len(),
        symbols.len()
    );
}
