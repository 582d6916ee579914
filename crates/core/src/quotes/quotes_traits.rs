use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use worthline_market_data::{CandleResolution, Quote, SearchResult};

use crate::errors::Result;
use crate::utils::Month;

/// Trait for quote lookups
#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// True when a market data provider is configured.
    fn is_enabled(&self) -> bool;

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote>;

    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        resolution: CandleResolution,
    ) -> Result<Vec<Quote>>;

    /// Close price per month between `start` and `end` inclusive.
    /// Months without a candle are absent from the map.
    async fn get_monthly_closes(
        &self,
        symbol: &str,
        start: Month,
        end: Month,
    ) -> Result<BTreeMap<Month, Decimal>>;

    /// Monthly closes for several symbols, fetched concurrently.
    /// Symbols that fail are logged and map to an empty series.
    async fn get_monthly_closes_batch(
        &self,
        symbols: &[String],
        start: Month,
        end: Month,
    ) -> HashMap<String, BTreeMap<Month, Decimal>>;

    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchResult>>;

    /// Latest close for each symbol. Symbols that fail are logged and left out.
    async fn get_latest_prices(&self, symbols: &[String]) -> HashMap<String, Decimal>;
}
