use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Duration, Utc};
use worthline_core::quotes::{CandleResolution, Quote, SearchResult};
use worthline_core::utils::time_utils::parse_date_input;

#[derive(serde::Deserialize)]
struct QuoteQuery {
    symbol: String,
}

async fn get_quote(
    State(state): State<Arc<AppState>>,
    Query(q): Query<QuoteQuery>,
) -> ApiResult<Json<Quote>> {
    let quote = state.quote_service.get_latest_quote(&q.symbol).await?;
    Ok(Json(quote))
}

#[derive(serde::Deserialize)]
struct SearchQuery {
    q: String,
}

async fn search_symbols(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> ApiResult<Json<Vec<SearchResult>>> {
    if q.q.trim().is_empty() {
        return Err(ApiError::BadRequest("Query 'q' must not be empty".to_string()));
    }
    let results = state.quote_service.search_symbols(&q.q).await?;
    Ok(Json(results))
}

#[derive(serde::Deserialize)]
struct HistoryQuery {
    symbol: String,
    /// Defaults to one year before `to`.
    from: Option<String>,
    /// Defaults to now.
    to: Option<String>,
    /// D, W or M.
    resolution: Option<String>,
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<Quote>>> {
    let end = match q.to.as_deref() {
        Some(to) => parse_date_input(to)?,
        None => Utc::now(),
    };
    let start = match q.from.as_deref() {
        Some(from) => parse_date_input(from)?,
        None => end - Duration::days(365),
    };
    let resolution = q
        .resolution
        .as_deref()
        .map(CandleResolution::parse)
        .unwrap_or_default();

    let quotes = state
        .quote_service
        .get_historical_quotes(&q.symbol, start, end, resolution)
        .await?;
    Ok(Json(quotes))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/market-data/quote", get(get_quote))
        .route("/market-data/search", get(search_symbols))
        .route("/market-data/history", get(get_history))
}
