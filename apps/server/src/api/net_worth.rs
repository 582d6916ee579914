use std::sync::Arc;

use crate::{api::shared::LimitQuery, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use worthline_core::net_worth::{
    ActivityFeedItem, MonthlySnapshot, NetWorthSummary, SnapshotRange,
};

#[derive(serde::Deserialize)]
struct SnapshotQuery {
    /// One of 3m, 12m, ytd, all. Anything else means 12m.
    range: Option<String>,
}

async fn get_snapshots(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SnapshotQuery>,
) -> ApiResult<Json<Vec<MonthlySnapshot>>> {
    let range = q
        .range
        .as_deref()
        .map(SnapshotRange::parse)
        .unwrap_or_default();
    let snapshots = state.net_worth_service.get_snapshots(range).await?;
    Ok(Json(snapshots))
}

async fn get_summary(State(state): State<Arc<AppState>>) -> ApiResult<Json<NetWorthSummary>> {
    let summary = state.net_worth_service.get_summary().await?;
    Ok(Json(summary))
}

async fn recompute_snapshots(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<MonthlySnapshot>>> {
    let snapshots = state.net_worth_service.recompute_snapshots().await?;
    Ok(Json(snapshots))
}

async fn get_recent_activity(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LimitQuery>,
) -> ApiResult<Json<Vec<ActivityFeedItem>>> {
    let items = state.net_worth_service.get_recent_activity(q.limit())?;
    Ok(Json(items))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/net-worth/snapshots", get(get_snapshots))
        .route("/net-worth/summary", get(get_summary))
        .route("/net-worth/recompute", post(recompute_snapshots))
        .route("/net-worth/recent", get(get_recent_activity))
}
