//! Net worth module.
//!
//! Rebuilds a contiguous monthly balance sheet from sparse valuation points
//! and dated transactions, overlays stock positions, and caches the result.

mod activity_feed;
mod enrichment;
mod net_worth_model;
mod net_worth_service;
mod net_worth_traits;
mod snapshot_calculator;

pub use activity_feed::build_activity_feed;
pub use enrichment::{apply_history_overlay, apply_latest_overlay};
pub use net_worth_model::*;
pub use net_worth_service::*;
pub use net_worth_traits::*;
pub use snapshot_calculator::{
    compute_monthly_snapshots, compute_monthly_snapshots_as_of, filter_by_range,
    filter_by_range_as_of,
};

#[cfg(test)]
mod net_worth_service_tests;
