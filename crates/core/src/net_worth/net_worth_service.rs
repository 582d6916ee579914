use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::Mutex;

use super::activity_feed::build_activity_feed;
use super::enrichment::{apply_history_overlay, apply_latest_overlay};
use super::net_worth_model::{ActivityFeedItem, MonthlySnapshot, NetWorthSummary, SnapshotRange};
use super::net_worth_traits::{NetWorthServiceTrait, SnapshotRepositoryTrait};
use super::snapshot_calculator::{compute_monthly_snapshots_as_of, filter_by_range_as_of};
use crate::errors::Result;
use crate::positions::{aggregate_positions, PositionRepositoryTrait};
use crate::quotes::QuoteServiceTrait;
use crate::transactions::TransactionRepositoryTrait;
use crate::utils::Month;
use crate::valuations::ValuationRepositoryTrait;

/// Owns the snapshot cache and its invalidation.
pub struct NetWorthService {
    valuation_repository: Arc<dyn ValuationRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    position_repository: Arc<dyn PositionRepositoryTrait>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
    recompute_lock: Mutex<()>,
}

impl NetWorthService {
    pub fn new(
        valuation_repository: Arc<dyn ValuationRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        position_repository: Arc<dyn PositionRepositoryTrait>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
        quote_service: Arc<dyn QuoteServiceTrait>,
    ) -> Self {
        Self {
            valuation_repository,
            transaction_repository,
            position_repository,
            snapshot_repository,
            quote_service,
            recompute_lock: Mutex::new(()),
        }
    }

    /// Recomputes as if `current` were the current month.
    pub async fn recompute_snapshots_as_of(&self, current: Month) -> Result<Vec<MonthlySnapshot>> {
        let _guard = self.recompute_lock.lock().await;

        let valuations = self.valuation_repository.list_valuations()?;
        let transactions = self.transaction_repository.list_transactions()?;
        let positions = self.position_repository.list_positions()?;

        let mut snapshots = compute_monthly_snapshots_as_of(&valuations, &transactions, current);

        if !positions.is_empty() && !snapshots.is_empty() {
            let aggregated = aggregate_positions(&positions);
            apply_history_overlay(&mut snapshots, &aggregated, self.quote_service.as_ref()).await;
            apply_latest_overlay(&mut snapshots, &positions, self.quote_service.as_ref()).await;
        }

        let stored = self
            .snapshot_repository
            .replace_snapshots(snapshots.clone())
            .await?;

        info!(
            "Recomputed {} monthly snapshots ({} valuations, {} transactions, {} positions)",
            stored,
            valuations.len(),
            transactions.len(),
            positions.len()
        );
        Ok(snapshots)
    }

    /// Cached snapshots, rebuilt first when the cache ends before `current`.
    async fn cached_snapshots_as_of(&self, current: Month) -> Result<Vec<MonthlySnapshot>> {
        let snapshots = self.snapshot_repository.list_snapshots()?;
        match snapshots.last() {
            Some(last) if last.date < current => {
                debug!("Snapshot cache ends at {}, extending to {}", last.date, current);
                self.recompute_snapshots_as_of(current).await
            }
            _ => Ok(snapshots),
        }
    }

    /// Cached snapshots inside `range` as viewed from `current`.
    pub async fn get_snapshots_as_of(
        &self,
        range: SnapshotRange,
        current: Month,
    ) -> Result<Vec<MonthlySnapshot>> {
        let snapshots = self.cached_snapshots_as_of(current).await?;
        let filtered = filter_by_range_as_of(&snapshots, range, current).to_vec();
        debug!(
            "Range {} keeps {} of {} snapshots",
            range,
            filtered.len(),
            snapshots.len()
        );
        Ok(filtered)
    }

    pub async fn get_summary_as_of(&self, current: Month) -> Result<NetWorthSummary> {
        let snapshots = self.cached_snapshots_as_of(current).await?;
        Ok(snapshots
            .last()
            .map(NetWorthSummary::from)
            .unwrap_or_default())
    }
}

#[async_trait]
impl NetWorthServiceTrait for NetWorthService {
    async fn recompute_snapshots(&self) -> Result<Vec<MonthlySnapshot>> {
        self.recompute_snapshots_as_of(Month::current()).await
    }

    async fn get_snapshots(&self, range: SnapshotRange) -> Result<Vec<MonthlySnapshot>> {
        self.get_snapshots_as_of(range, Month::current()).await
    }

    async fn get_summary(&self) -> Result<NetWorthSummary> {
        self.get_summary_as_of(Month::current()).await
    }

    fn get_recent_activity(&self, limit: usize) -> Result<Vec<ActivityFeedItem>> {
        let valuations = self.valuation_repository.list_valuations()?;
        let transactions = self.transaction_repository.list_transactions()?;
        Ok(build_activity_feed(&valuations, &transactions, limit))
    }
}
