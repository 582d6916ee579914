use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use rust_decimal::Decimal;
use worthline_market_data::{
    CandleResolution, MarketDataError, MarketDataProvider, Quote, SearchResult,
};

use super::quotes_traits::QuoteServiceTrait;
use crate::errors::{Error, Result, ValidationError};
use crate::utils::time_utils::{month_end_utc, month_start_utc};
use crate::utils::Month;

pub struct QuoteService {
    provider: Option<Arc<dyn MarketDataProvider>>,
}

impl QuoteService {
    pub fn new(provider: Option<Arc<dyn MarketDataProvider>>) -> Self {
        QuoteService { provider }
    }

    fn provider(&self) -> Result<&Arc<dyn MarketDataProvider>> {
        self.provider
            .as_ref()
            .ok_or(Error::MarketData(MarketDataError::NoProvidersAvailable))
    }

    /// Parallel request bound taken from the provider's rate limit.
    fn concurrency(&self) -> usize {
        self.provider
            .as_ref()
            .map(|p| p.rate_limit().max_concurrency)
            .unwrap_or(1)
            .max(1)
    }

    fn normalize_symbol(symbol: &str) -> Result<String> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "symbol".to_string(),
            )));
        }
        Ok(symbol)
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote> {
        let symbol = Self::normalize_symbol(symbol)?;
        let provider = self.provider()?;
        Ok(provider.get_latest_quote(&symbol).await?)
    }

    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        resolution: CandleResolution,
    ) -> Result<Vec<Quote>> {
        let symbol = Self::normalize_symbol(symbol)?;
        let provider = self.provider()?;
        Ok(provider
            .get_historical_quotes(&symbol, start, end, resolution)
            .await?)
    }

    async fn get_monthly_closes(
        &self,
        symbol: &str,
        start: Month,
        end: Month,
    ) -> Result<BTreeMap<Month, Decimal>> {
        if end < start {
            return Ok(BTreeMap::new());
        }

        let quotes = match self
            .get_historical_quotes(
                symbol,
                month_start_utc(start),
                month_end_utc(end),
                CandleResolution::Monthly,
            )
            .await
        {
            Ok(quotes) => quotes,
            Err(Error::MarketData(MarketDataError::NoDataForRange)) => Vec::new(),
            Err(e) => return Err(e),
        };

        // Quotes are ascending; a later candle in the same month wins
        let closes: BTreeMap<Month, Decimal> = quotes
            .into_iter()
            .map(|q| (Month::from_datetime(q.timestamp), q.close))
            .filter(|(month, _)| *month >= start && *month <= end)
            .collect();

        debug!(
            "Loaded {} monthly closes for {} ({} to {})",
            closes.len(),
            symbol,
            start,
            end
        );
        Ok(closes)
    }

    async fn get_monthly_closes_batch(
        &self,
        symbols: &[String],
        start: Month,
        end: Month,
    ) -> HashMap<String, BTreeMap<Month, Decimal>> {
        if self.provider.is_none() {
            return symbols
                .iter()
                .map(|s| (s.clone(), BTreeMap::new()))
                .collect();
        }

        stream::iter(symbols.iter().cloned())
            .map(|symbol| async move {
                let closes = match self.get_monthly_closes(&symbol, start, end).await {
                    Ok(closes) => closes,
                    Err(e) => {
                        warn!("History fetch failed for {}: {}", symbol, e);
                        BTreeMap::new()
                    }
                };
                (symbol, closes)
            })
            .buffer_unordered(self.concurrency())
            .collect()
            .await
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "q".to_string(),
            )));
        }
        let provider = self.provider()?;
        Ok(provider.search(query).await?)
    }

    async fn get_latest_prices(&self, symbols: &[String]) -> HashMap<String, Decimal> {
        let provider = match self.provider.as_ref() {
            Some(provider) => provider,
            None => return HashMap::new(),
        };
        let concurrency = self.concurrency();

        stream::iter(symbols.iter().cloned())
            .map(|symbol| async move {
                let result = provider.get_latest_quote(&symbol).await;
                (symbol, result)
            })
            .buffer_unordered(concurrency)
            .filter_map(|(symbol, result)| async move {
                match result {
                    Ok(quote) => Some((symbol, quote.close)),
                    Err(e) => {
                        warn!("Failed to fetch latest quote for {}: {}", symbol, e);
                        None
                    }
                }
            })
            .collect()
            .await
    }
}
