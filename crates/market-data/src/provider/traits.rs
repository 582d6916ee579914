//! Market data provider trait definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MarketDataError;
use crate::models::{CandleResolution, Quote, SearchResult};

use super::capabilities::{ProviderCapabilities, RateLimit};

/// Trait for market data providers.
///
/// Implement this trait to add a new quote source. Symbols are passed
/// through as the user typed them (upper-cased by the caller).
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "FINNHUB".
    fn id(&self) -> &'static str;

    /// Provider priority for ordering. Lower values = higher priority.
    fn priority(&self) -> u8 {
        10
    }

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Rate limiting configuration.
    fn rate_limit(&self) -> RateLimit;

    /// Fetch the latest quote for a symbol.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Fetch historical candles for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Provider symbol (e.g. "AAPL")
    /// * `start` - Start of the range (inclusive)
    /// * `end` - End of the range (inclusive)
    /// * `resolution` - Candle width
    ///
    /// # Returns
    ///
    /// Quotes ordered by timestamp ascending, or `NoDataForRange` when empty.
    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        resolution: CandleResolution,
    ) -> Result<Vec<Quote>, MarketDataError>;

    /// Search for symbols matching the query.
    /// Default implementation returns `NotSupported`.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let _ = query;
        Err(MarketDataError::NotSupported {
            operation: "search".to_string(),
            provider: self.id().to_string(),
        })
    }
}
