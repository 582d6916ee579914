//! Monthly snapshot reconstruction.
//!
//! Valuation points are sparse: an item is valued whenever the user records
//! it. Each `(kind, name)` item carries its latest value forward until a newer
//! point replaces it. Transactions accumulate into a running cash total that
//! counts as an asset. The engine is pure and never fails.

use std::collections::BTreeMap;

use log::debug;
use rust_decimal::Decimal;

use super::net_worth_model::{MonthlySnapshot, SnapshotRange};
use crate::transactions::Transaction;
use crate::utils::Month;
use crate::valuations::{ValuationKind, ValuationPoint};

/// Forward-fill state of one tracked item.
struct Track<'a> {
    kind: ValuationKind,
    /// Points ordered by month; equal months keep input order
    points: Vec<&'a ValuationPoint>,
    next: usize,
    in_effect: Option<Decimal>,
}

impl<'a> Track<'a> {
    /// Moves past every point at or before `month` and returns the value in effect.
    fn advance_to(&mut self, month: Month) -> Option<Decimal> {
        while let Some(point) = self.points.get(self.next) {
            if point.month > month {
                break;
            }
            self.in_effect = Some(point.value);
            self.next += 1;
        }
        self.in_effect
    }
}

/// Builds the monthly series through the current UTC month.
pub fn compute_monthly_snapshots(
    valuations: &[ValuationPoint],
    transactions: &[Transaction],
) -> Vec<MonthlySnapshot> {
    compute_monthly_snapshots_as_of(valuations, transactions, Month::current())
}

/// Builds the monthly series as if `current` were the current month.
///
/// The series starts at the earliest month found in either input and ends at
/// the later of the latest input month and `current`. It is contiguous and
/// ascending. Both inputs empty gives an empty series.
pub fn compute_monthly_snapshots_as_of(
    valuations: &[ValuationPoint],
    transactions: &[Transaction],
    current: Month,
) -> Vec<MonthlySnapshot> {
    // =====================================================================
    // 1. Group valuations per item, ordered by month (stable)
    // =====================================================================
    let mut grouped: BTreeMap<(ValuationKind, &str), Vec<&ValuationPoint>> = BTreeMap::new();
    for point in valuations {
        grouped
            .entry((point.kind, point.name.as_str()))
            .or_default()
            .push(point);
    }

    let mut tracks: Vec<Track> = grouped
        .into_iter()
        .map(|((kind, _), mut points)| {
            points.sort_by_key(|p| p.month);
            Track {
                kind,
                points,
                next: 0,
                in_effect: None,
            }
        })
        .collect();

    // =====================================================================
    // 2. Bucket transactions by month
    // =====================================================================
    let mut transaction_totals: BTreeMap<Month, Decimal> = BTreeMap::new();
    for transaction in transactions {
        *transaction_totals
            .entry(transaction.month())
            .or_insert(Decimal::ZERO) += transaction.amount;
    }

    // =====================================================================
    // 3. Resolve the month range
    // =====================================================================
    let valuation_months = tracks
        .iter()
        .flat_map(|t| [t.points.first(), t.points.last()])
        .flatten()
        .map(|p| p.month);
    let transaction_months = [
        transaction_totals.keys().next(),
        transaction_totals.keys().next_back(),
    ]
    .into_iter()
    .flatten()
    .copied();

    let (first, last) = match valuation_months.chain(transaction_months).fold(
        None,
        |acc: Option<(Month, Month)>, month| match acc {
            None => Some((month, month)),
            Some((lo, hi)) => Some((lo.min(month), hi.max(month))),
        },
    ) {
        Some(bounds) => bounds,
        None => return Vec::new(),
    };
    let last = last.max(current);

    debug!(
        "Computing snapshots {} to {} from {} valuation points over {} items and {} transaction months",
        first,
        last,
        valuations.len(),
        tracks.len(),
        transaction_totals.len()
    );

    // =====================================================================
    // 4. Sweep months, forward-filling items and accumulating cash
    // =====================================================================
    let mut pending_transactions = transaction_totals.into_iter().peekable();
    let mut cumulative_cash = Decimal::ZERO;
    let mut snapshots = Vec::with_capacity(first.months_until(last) as usize + 1);

    for month in first.iter_through(last) {
        while let Some((_, amount)) = pending_transactions.next_if(|(m, _)| *m <= month) {
            cumulative_cash += amount;
        }

        let mut assets = cumulative_cash;
        let mut liabilities = Decimal::ZERO;
        for track in tracks.iter_mut() {
            if let Some(value) = track.advance_to(month) {
                match track.kind {
                    ValuationKind::Asset => assets += value,
                    ValuationKind::Liability => liabilities += value,
                }
            }
        }

        snapshots.push(MonthlySnapshot::new(month, assets, liabilities));
    }

    snapshots
}

/// Keeps the snapshots inside `range`, viewed from the current UTC month.
pub fn filter_by_range(snapshots: &[MonthlySnapshot], range: SnapshotRange) -> &[MonthlySnapshot] {
    filter_by_range_as_of(snapshots, range, Month::current())
}

/// Keeps the ascending suffix of `snapshots` whose month is on or after the
/// range cutoff computed from `current`.
pub fn filter_by_range_as_of(
    snapshots: &[MonthlySnapshot],
    range: SnapshotRange,
    current: Month,
) -> &[MonthlySnapshot] {
    match range.cutoff(current) {
        Some(cutoff) => {
            let start = snapshots.partition_point(|s| s.date < cutoff);
            &snapshots[start..]
        }
        None => snapshots,
    }
}
