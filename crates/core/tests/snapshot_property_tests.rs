//! Property-based integration tests for the snapshot engine.
//!
//! These tests check the series laws over random valuation and transaction
//! histories, using the `proptest` crate for random test case generation.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use worthline_core::net_worth::{
    compute_monthly_snapshots_as_of, filter_by_range_as_of, SnapshotRange,
};
use worthline_core::transactions::Transaction;
use worthline_core::utils::Month;
use worthline_core::valuations::{ValuationKind, ValuationPoint};

// =============================================================================
// Generators
// =============================================================================

fn base_month() -> Month {
    Month::new(2020, 1).unwrap()
}

/// A month between 2020-01 and 2024-12.
fn arb_month() -> impl Strategy<Value = Month> {
    (0i32..60).prop_map(|offset| base_month().add_months(offset))
}

fn arb_kind() -> impl Strategy<Value = ValuationKind> {
    prop_oneof![Just(ValuationKind::Asset), Just(ValuationKind::Liability)]
}

/// Generates a valuation point for one of a handful of item names.
fn arb_valuation() -> impl Strategy<Value = ValuationPoint> {
    (
        arb_kind(),
        prop::sample::select(vec!["House", "Car", "Loan", "Card"]),
        0i64..1_000_000,
        arb_month(),
        "[a-f0-9]{8}",
    )
        .prop_map(|(kind, name, value, month, id)| ValuationPoint {
            id,
            kind,
            name: name.to_string(),
            value: Decimal::from(value),
            date: Utc.from_utc_datetime(&month.first_day().and_hms_opt(0, 0, 0).unwrap()),
            month,
            desc: String::new(),
        })
}

/// Generates a transaction on a day inside a random month.
fn arb_transaction() -> impl Strategy<Value = Transaction> {
    (arb_month(), 1u32..=28, -5_000i64..5_000, "[a-f0-9]{8}").prop_map(
        |(month, day, amount, id)| Transaction {
            id,
            date: Utc
                .with_ymd_and_hms(month.year(), month.month(), day, 12, 0, 0)
                .unwrap(),
            amount: Decimal::from(amount),
            description: String::new(),
            category: "Uncategorized".to_string(),
            account: "General".to_string(),
            notes: String::new(),
        },
    )
}

fn arb_history() -> impl Strategy<Value = (Vec<ValuationPoint>, Vec<Transaction>)> {
    (
        proptest::collection::vec(arb_valuation(), 0..30),
        proptest::collection::vec(arb_transaction(), 0..30),
    )
}

/// Asset and liability totals at `month`, taking each item's latest point
/// at or before it.
fn forward_filled_totals(valuations: &[ValuationPoint], month: Month) -> (Decimal, Decimal) {
    let mut latest: BTreeMap<(ValuationKind, &str), &ValuationPoint> = BTreeMap::new();
    for point in valuations.iter().filter(|v| v.month <= month) {
        let key = (point.kind, point.name.as_str());
        match latest.get(&key) {
            Some(seen) if seen.month > point.month => {}
            _ => {
                latest.insert(key, point);
            }
        }
    }

    latest
        .values()
        .fold((Decimal::ZERO, Decimal::ZERO), |(assets, liabilities), point| {
            match point.kind {
                ValuationKind::Asset => (assets + point.value, liabilities),
                ValuationKind::Liability => (assets, liabilities + point.value),
            }
        })
}

fn current() -> Month {
    Month::new(2025, 3).unwrap()
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Months are contiguous, ascending and end at the current month.
    #[test]
    fn prop_series_is_contiguous((valuations, transactions) in arb_history()) {
        let snapshots = compute_monthly_snapshots_as_of(&valuations, &transactions, current());
        if valuations.is_empty() && transactions.is_empty() {
            prop_assert!(snapshots.is_empty());
        } else {
            prop_assert_eq!(snapshots.last().map(|s| s.date), Some(current()));
            for pair in snapshots.windows(2) {
                prop_assert_eq!(pair[0].date.succ(), pair[1].date);
            }

            let earliest = valuations
                .iter()
                .map(|v| v.month)
                .chain(transactions.iter().map(|t| t.month()))
                .min();
            prop_assert_eq!(snapshots.first().map(|s| s.date), earliest);
        }
    }

    /// Net worth is always assets minus liabilities.
    #[test]
    fn prop_net_worth_identity((valuations, transactions) in arb_history()) {
        let snapshots = compute_monthly_snapshots_as_of(&valuations, &transactions, current());
        for snapshot in &snapshots {
            prop_assert_eq!(snapshot.net_worth, snapshot.assets - snapshot.liabilities);
            prop_assert!(snapshot.positions_value.is_none());
        }
    }

    /// Without transactions, every month carries, per (kind, name) item, the
    /// value of the latest point at or before it. Later input wins within a month.
    #[test]
    fn prop_items_forward_fill(valuations in proptest::collection::vec(arb_valuation(), 1..30)) {
        let snapshots = compute_monthly_snapshots_as_of(&valuations, &[], current());
        for snapshot in &snapshots {
            let (assets, liabilities) = forward_filled_totals(&valuations, snapshot.date);
            prop_assert_eq!(snapshot.assets, assets, "assets at {}", snapshot.date);
            prop_assert_eq!(snapshot.liabilities, liabilities, "liabilities at {}", snapshot.date);
        }
    }

    /// With only transactions, assets are the running cash total.
    #[test]
    fn prop_cumulative_cash(transactions in proptest::collection::vec(arb_transaction(), 1..30)) {
        let snapshots = compute_monthly_snapshots_as_of(&[], &transactions, current());
        for snapshot in &snapshots {
            let expected: Decimal = transactions
                .iter()
                .filter(|t| t.month() <= snapshot.date)
                .map(|t| t.amount)
                .sum();
            prop_assert_eq!(snapshot.assets, expected);
            prop_assert_eq!(snapshot.liabilities, Decimal::ZERO);
        }
    }

    /// Every range keeps an ascending suffix of the series.
    #[test]
    fn prop_range_is_suffix(
        (valuations, transactions) in arb_history(),
        range in prop_oneof![
            Just(SnapshotRange::ThreeMonths),
            Just(SnapshotRange::TwelveMonths),
            Just(SnapshotRange::YearToDate),
            Just(SnapshotRange::All),
        ],
    ) {
        let snapshots = compute_monthly_snapshots_as_of(&valuations, &transactions, current());
        let filtered = filter_by_range_as_of(&snapshots, range, current());
        prop_assert!(snapshots.ends_with(filtered));
        if let Some(cutoff) = range.cutoff(current()) {
            prop_assert!(filtered.iter().all(|s| s.date >= cutoff));
            let dropped = &snapshots[..snapshots.len() - filtered.len()];
            prop_assert!(dropped.iter().all(|s| s.date < cutoff));
        } else {
            prop_assert_eq!(filtered.len(), snapshots.len());
        }
    }
}
