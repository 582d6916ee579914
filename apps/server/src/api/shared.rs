use std::sync::Arc;

use serde::Deserialize;
use worthline_core::constants::DEFAULT_RECENT_LIMIT;

use crate::main_lib::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

impl LimitQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_RECENT_LIMIT)
    }
}

/// Rebuilds the snapshot cache in the background after a mutation.
///
/// Recomputes are serialized inside the service, so bursts of edits queue up
/// and the last one to run sees every change.
pub fn trigger_snapshot_recompute(state: Arc<AppState>) {
    tokio::spawn(async move {
        match state.net_worth_service.recompute_snapshots().await {
            Ok(snapshots) => {
                tracing::debug!("Background recompute produced {} snapshots", snapshots.len())
            }
            Err(err) => tracing::error!("Background snapshot recompute failed: {}", err),
        }
    });
}
