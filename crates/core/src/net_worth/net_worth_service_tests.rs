//! Unit tests for the net worth service.

use super::*;
use crate::errors::{Error, Result};
use crate::positions::{Position, PositionRepositoryTrait};
use crate::quotes::{CandleResolution, Quote, QuoteServiceTrait, SearchResult};
use crate::transactions::{Transaction, TransactionRepositoryTrait};
use crate::utils::Month;
use crate::valuations::{
    ValuationKind, ValuationPoint, ValuationRepositoryTrait, ValuationUpdate,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockValuationRepository {
    points: Vec<ValuationPoint>,
}

#[async_trait]
impl ValuationRepositoryTrait for MockValuationRepository {
    fn list_valuations(&self) -> Result<Vec<ValuationPoint>> {
        Ok(self.points.clone())
    }

    fn get_valuation(&self, valuation_id: &str) -> Result<ValuationPoint> {
        Err(Error::not_found(valuation_id))
    }

    fn count_valuations(&self) -> Result<i64> {
        Ok(self.points.len() as i64)
    }

    async fn insert_valuations(&self, _points: Vec<ValuationPoint>) -> Result<usize> {
        unimplemented!()
    }

    async fn update_valuation(
        &self,
        _valuation_id: String,
        _update: ValuationUpdate,
    ) -> Result<ValuationPoint> {
        unimplemented!()
    }

    async fn delete_valuation(&self, _valuation_id: String) -> Result<usize> {
        unimplemented!()
    }
}

#[derive(Default)]
struct MockTransactionRepository {
    transactions: Vec<Transaction>,
}

#[async_trait]
impl TransactionRepositoryTrait for MockTransactionRepository {
    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.transactions.clone())
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        Err(Error::not_found(transaction_id))
    }

    async fn insert_transactions(&self, _transactions: Vec<Transaction>) -> Result<usize> {
        unimplemented!()
    }

    async fn update_transaction(&self, _transaction: Transaction) -> Result<Transaction> {
        unimplemented!()
    }

    async fn delete_transaction(&self, _transaction_id: String) -> Result<usize> {
        unimplemented!()
    }
}

#[derive(Default)]
struct MockPositionRepository {
    positions: Vec<Position>,
}

#[async_trait]
impl PositionRepositoryTrait for MockPositionRepository {
    fn list_positions(&self) -> Result<Vec<Position>> {
        Ok(self.positions.clone())
    }

    fn get_position(&self, position_id: &str) -> Result<Position> {
        Err(Error::not_found(position_id))
    }

    async fn insert_position(&self, _position: Position) -> Result<Position> {
        unimplemented!()
    }

    async fn update_position(&self, _position: Position) -> Result<Position> {
        unimplemented!()
    }

    async fn delete_position(&self, _position_id: String) -> Result<usize> {
        unimplemented!()
    }
}

#[derive(Default)]
struct MockSnapshotRepository {
    snapshots: RwLock<Vec<MonthlySnapshot>>,
    replace_calls: AtomicUsize,
}

#[async_trait]
impl SnapshotRepositoryTrait for MockSnapshotRepository {
    fn list_snapshots(&self) -> Result<Vec<MonthlySnapshot>> {
        Ok(self.snapshots.read().unwrap().clone())
    }

    async fn replace_snapshots(&self, snapshots: Vec<MonthlySnapshot>) -> Result<usize> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);
        let count = snapshots.len();
        *self.snapshots.write().unwrap() = snapshots;
        Ok(count)
    }
}

/// Serves fixed monthly closes and latest prices.
#[derive(Default)]
struct MockQuoteService {
    closes: HashMap<String, BTreeMap<Month, Decimal>>,
    latest: HashMap<String, Decimal>,
}

#[async_trait]
impl QuoteServiceTrait for MockQuoteService {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_latest_quote(&self, _symbol: &str) -> Result<Quote> {
        unimplemented!()
    }

    async fn get_historical_quotes(
        &self,
        _symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _resolution: CandleResolution,
    ) -> Result<Vec<Quote>> {
        unimplemented!()
    }

    async fn get_monthly_closes(
        &self,
        symbol: &str,
        _start: Month,
        _end: Month,
    ) -> Result<BTreeMap<Month, Decimal>> {
        Ok(self.closes.get(symbol).cloned().unwrap_or_default())
    }

    async fn get_monthly_closes_batch(
        &self,
        symbols: &[String],
        _start: Month,
        _end: Month,
    ) -> HashMap<String, BTreeMap<Month, Decimal>> {
        symbols
            .iter()
            .filter_map(|s| self.closes.get(s).map(|c| (s.clone(), c.clone())))
            .collect()
    }

    async fn search_symbols(&self, _query: &str) -> Result<Vec<SearchResult>> {
        Ok(Vec::new())
    }

    async fn get_latest_prices(&self, symbols: &[String]) -> HashMap<String, Decimal> {
        symbols
            .iter()
            .filter_map(|s| self.latest.get(s).map(|p| (s.clone(), *p)))
            .collect()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn month(year: i32, m: u32) -> Month {
    Month::new(year, m).unwrap()
}

fn valuation(id: &str, kind: ValuationKind, name: &str, value: Decimal, at: Month) -> ValuationPoint {
    ValuationPoint {
        id: id.to_string(),
        kind,
        name: name.to_string(),
        value,
        date: Utc.from_utc_datetime(&at.first_day().and_hms_opt(0, 0, 0).unwrap()),
        month: at,
        desc: String::new(),
    }
}

fn transaction(id: &str, amount: Decimal, y: i32, m: u32, d: u32) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap(),
        amount,
        description: format!("{} payment", id),
        category: "Uncategorized".to_string(),
        account: "General".to_string(),
        notes: String::new(),
    }
}

fn position(id: &str, symbol: &str, shares: Decimal, avg_cost: Decimal) -> Position {
    Position {
        id: id.to_string(),
        symbol: symbol.to_string(),
        shares,
        avg_cost,
        account: "Brokerage".to_string(),
        added_date: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        notes: String::new(),
    }
}

struct Fixture {
    service: NetWorthService,
    snapshots: Arc<MockSnapshotRepository>,
}

fn fixture(
    points: Vec<ValuationPoint>,
    transactions: Vec<Transaction>,
    positions: Vec<Position>,
    quotes: MockQuoteService,
) -> Fixture {
    let snapshots = Arc::new(MockSnapshotRepository::default());
    let service = NetWorthService::new(
        Arc::new(MockValuationRepository { points }),
        Arc::new(MockTransactionRepository { transactions }),
        Arc::new(MockPositionRepository { positions }),
        snapshots.clone(),
        Arc::new(quotes),
    );
    Fixture { service, snapshots }
}

fn household() -> (Vec<ValuationPoint>, Vec<Transaction>) {
    let points = vec![
        valuation("v1", ValuationKind::Asset, "House", dec!(300000), month(2024, 1)),
        valuation("v2", ValuationKind::Liability, "Mortgage", dec!(200000), month(2024, 1)),
        valuation("v3", ValuationKind::Liability, "Mortgage", dec!(198000), month(2024, 3)),
    ];
    let transactions = vec![
        transaction("t1", dec!(5000), 2024, 2, 1),
        transaction("t2", dec!(-1500), 2024, 2, 20),
    ];
    (points, transactions)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_recompute_replaces_cache() {
    let (points, transactions) = household();
    let f = fixture(points, transactions, Vec::new(), MockQuoteService::default());

    let snapshots = f
        .service
        .recompute_snapshots_as_of(month(2024, 4))
        .await
        .unwrap();

    assert_eq!(snapshots.len(), 4);
    assert_eq!(f.snapshots.replace_calls.load(Ordering::SeqCst), 1);
    assert_eq!(f.snapshots.list_snapshots().unwrap(), snapshots);

    let april = snapshots.last().unwrap();
    assert_eq!(april.date, month(2024, 4));
    assert_eq!(april.assets, dec!(303500));
    assert_eq!(april.liabilities, dec!(198000));
    assert_eq!(april.net_worth, dec!(105500));
    assert_eq!(april.positions_value, None);
    assert_eq!(april.base_assets, None);
}

#[tokio::test]
async fn test_recompute_with_positions_overlays() {
    let (points, transactions) = household();
    let mut closes = HashMap::new();
    closes.insert(
        "VTI".to_string(),
        BTreeMap::from([(month(2024, 1), dec!(230)), (month(2024, 2), dec!(240))]),
    );
    let quotes = MockQuoteService {
        closes,
        latest: HashMap::from([("VTI".to_string(), dec!(260))]),
    };
    let positions = vec![
        position("p1", "VTI", dec!(10), dec!(200)),
        position("p2", "VTI", dec!(10), dec!(220)),
    ];
    let f = fixture(points, transactions, positions, quotes);

    let snapshots = f
        .service
        .recompute_snapshots_as_of(month(2024, 4))
        .await
        .unwrap();

    // January and February use monthly closes
    assert_eq!(snapshots[0].positions_value, Some(dec!(4600)));
    assert_eq!(snapshots[0].base_assets, Some(dec!(300000)));
    assert_eq!(snapshots[0].assets, dec!(304600));
    assert_eq!(snapshots[1].positions_value, Some(dec!(4800)));

    // March has no close, falls back to the aggregated average cost
    assert_eq!(snapshots[2].positions_value, Some(dec!(4200)));

    // April takes the latest price
    let april = snapshots.last().unwrap();
    assert_eq!(april.positions_value, Some(dec!(5200)));
    assert_eq!(april.base_assets, Some(dec!(303500)));
    assert_eq!(april.assets, dec!(308700));
    assert_eq!(april.net_worth, april.assets - april.liabilities);
}

#[tokio::test]
async fn test_recompute_twice_gives_same_series() {
    let (points, transactions) = household();
    let quotes = MockQuoteService {
        closes: HashMap::new(),
        latest: HashMap::from([("AAPL".to_string(), dec!(190))]),
    };
    let f = fixture(
        points,
        transactions,
        vec![position("p1", "AAPL", dec!(5), dec!(150))],
        quotes,
    );

    let first = f
        .service
        .recompute_snapshots_as_of(month(2024, 4))
        .await
        .unwrap();
    let second = f
        .service
        .recompute_snapshots_as_of(month(2024, 4))
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(f.snapshots.replace_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_recompute_with_no_data_clears_cache() {
    let f = fixture(Vec::new(), Vec::new(), Vec::new(), MockQuoteService::default());
    *f.snapshots.snapshots.write().unwrap() =
        vec![MonthlySnapshot::new(month(2023, 1), dec!(1), dec!(0))];

    let snapshots = f
        .service
        .recompute_snapshots_as_of(month(2024, 4))
        .await
        .unwrap();

    assert!(snapshots.is_empty());
    assert!(f.snapshots.list_snapshots().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_snapshots_filters_cached_range() {
    let points = vec![valuation(
        "v1",
        ValuationKind::Asset,
        "Savings",
        dec!(1000),
        month(2023, 1),
    )];
    let f = fixture(points, Vec::new(), Vec::new(), MockQuoteService::default());
    f.service
        .recompute_snapshots_as_of(month(2024, 6))
        .await
        .unwrap();

    let three = f
        .service
        .get_snapshots_as_of(SnapshotRange::ThreeMonths, month(2024, 6))
        .await
        .unwrap();
    let dates: Vec<Month> = three.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![month(2024, 4), month(2024, 5), month(2024, 6)]);

    let ytd = f
        .service
        .get_snapshots_as_of(SnapshotRange::YearToDate, month(2024, 6))
        .await
        .unwrap();
    assert_eq!(ytd.len(), 6);

    let all = f
        .service
        .get_snapshots_as_of(SnapshotRange::All, month(2024, 6))
        .await
        .unwrap();
    assert_eq!(all.len(), 18);

    let fallback = f
        .service
        .get_snapshots_as_of(SnapshotRange::parse("5y"), month(2024, 6))
        .await
        .unwrap();
    assert_eq!(fallback.len(), 12);
}

#[tokio::test]
async fn test_summary_uses_latest_snapshot() {
    let (points, transactions) = household();
    let f = fixture(points, transactions, Vec::new(), MockQuoteService::default());

    let empty = f.service.get_summary_as_of(month(2024, 4)).await.unwrap();
    assert_eq!(empty.as_of, None);
    assert_eq!(empty.net_worth, Decimal::ZERO);

    f.service
        .recompute_snapshots_as_of(month(2024, 4))
        .await
        .unwrap();
    let summary = f.service.get_summary_as_of(month(2024, 4)).await.unwrap();
    assert_eq!(summary.as_of, Some(month(2024, 4)));
    assert_eq!(summary.net_worth, dec!(105500));
}

#[tokio::test]
async fn test_stale_cache_is_extended_to_current_month() {
    let points = vec![valuation(
        "v1",
        ValuationKind::Asset,
        "Savings",
        dec!(1000),
        month(2024, 1),
    )];
    let f = fixture(points, Vec::new(), Vec::new(), MockQuoteService::default());
    f.service
        .recompute_snapshots_as_of(month(2024, 4))
        .await
        .unwrap();
    assert_eq!(f.snapshots.replace_calls.load(Ordering::SeqCst), 1);

    let three = f
        .service
        .get_snapshots_as_of(SnapshotRange::ThreeMonths, month(2024, 6))
        .await
        .unwrap();
    let dates: Vec<Month> = three.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![month(2024, 4), month(2024, 5), month(2024, 6)]);
    assert_eq!(f.snapshots.replace_calls.load(Ordering::SeqCst), 2);

    let summary = f.service.get_summary_as_of(month(2024, 6)).await.unwrap();
    assert_eq!(summary.as_of, Some(month(2024, 6)));
    assert_eq!(summary.net_worth, dec!(1000));
    assert_eq!(f.snapshots.replace_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_recent_activity_merges_and_limits() {
    let (points, transactions) = household();
    let f = fixture(points, transactions, Vec::new(), MockQuoteService::default());

    let feed = f.service.get_recent_activity(3).unwrap();
    let ids: Vec<&str> = feed.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["v3", "t2", "t1"]);
    assert_eq!(feed[1].label, "expense");
    assert_eq!(feed[2].label, "income");
}
