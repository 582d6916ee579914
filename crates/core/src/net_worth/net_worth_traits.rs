//! Net worth service traits.

use async_trait::async_trait;

use super::net_worth_model::{ActivityFeedItem, MonthlySnapshot, NetWorthSummary, SnapshotRange};
use crate::errors::Result;

/// Persistence for the derived snapshot series.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Cached snapshots ordered by month ascending.
    fn list_snapshots(&self) -> Result<Vec<MonthlySnapshot>>;

    /// Replaces the whole cache in one transaction. Returns the number stored.
    async fn replace_snapshots(&self, snapshots: Vec<MonthlySnapshot>) -> Result<usize>;
}

/// Trait defining the contract for net worth operations.
#[async_trait]
pub trait NetWorthServiceTrait: Send + Sync {
    /// Rebuilds the series from valuations, transactions and positions.
    ///
    /// Runs the snapshot engine, applies the history and latest positions
    /// overlays, then replaces the cache. Concurrent calls run one at a time.
    async fn recompute_snapshots(&self) -> Result<Vec<MonthlySnapshot>>;

    /// Cached snapshots inside `range`, ascending. A cache that ends before
    /// the current month is rebuilt first.
    async fn get_snapshots(&self, range: SnapshotRange) -> Result<Vec<MonthlySnapshot>>;

    /// Figures from the latest snapshot, zeros when there is none.
    async fn get_summary(&self) -> Result<NetWorthSummary>;

    /// Valuations and transactions merged, newest first.
    fn get_recent_activity(&self, limit: usize) -> Result<Vec<ActivityFeedItem>>;
}
