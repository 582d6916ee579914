//! Finnhub market data provider implementation.
//!
//! This module provides market data from the Finnhub API:
//! - Latest prices via /quote
//! - Daily, weekly and monthly candles via /stock/candle
//! - Symbol search via /search
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{CandleResolution, Quote, SearchResult};
use crate::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

const BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";
const QUOTE_CURRENCY: &str = "USD";

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// High price of the day
    h: Option<f64>,
    /// Low price of the day
    l: Option<f64>,
    /// Open price of the day
    o: Option<f64>,
    /// Previous close
    pc: Option<f64>,
    /// Timestamp (Unix)
    t: Option<i64>,
}

/// Response from /stock/candle endpoint
#[derive(Debug, Deserialize)]
struct CandleResponse {
    /// Status: "ok" or "no_data"
    s: String,
    #[serde(default)]
    c: Vec<f64>,
    #[serde(default)]
    h: Vec<f64>,
    #[serde(default)]
    l: Vec<f64>,
    #[serde(default)]
    o: Vec<f64>,
    #[serde(default)]
    v: Vec<f64>,
    #[serde(default)]
    t: Vec<i64>,
}

/// Response from /search endpoint
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    description: String,
    display_symbol: String,
    symbol: String,
    #[serde(rename = "type")]
    security_type: String,
}

/// Error response from Finnhub
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub market data provider.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider with the given API key.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different API root (a local proxy, for example).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Make a GET request to the Finnhub API.
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let request = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", &self.api_key)
            .query(params);

        debug!("Finnhub request: {} with {} params", endpoint, params.len());

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Request failed: {}", e),
                }
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Invalid or missing API key".to_string(),
            });
        }

        // Finnhub answers 403 once the plan quota is used up
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(&body) {
                if let Some(error_msg) = error_resp.error {
                    return Err(MarketDataError::ProviderError {
                        provider: PROVIDER_ID.to_string(),
                        message: error_msg,
                    });
                }
            }

            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read response: {}", e),
            })
    }
}

// ============================================================================
// Response parsing
// ============================================================================

fn parse_error(what: &str, e: serde_json::Error) -> MarketDataError {
    MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message: format!("Failed to parse {} response: {}", what, e),
    }
}

/// Converts a /quote body into a [`Quote`].
fn parse_quote_response(symbol: &str, text: &str) -> Result<Quote, MarketDataError> {
    let response: QuoteResponse =
        serde_json::from_str(text).map_err(|e| parse_error("quote", e))?;

    let close = response.c.ok_or_else(|| {
        MarketDataError::SymbolNotFound(format!("No quote data for symbol: {}", symbol))
    })?;

    // Finnhub returns zeros for unknown symbols instead of an error
    if close == 0.0 && response.o.unwrap_or(0.0) == 0.0 {
        return Err(MarketDataError::SymbolNotFound(format!(
            "Symbol not found or no trading data: {}",
            symbol
        )));
    }

    let timestamp = response
        .t
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .unwrap_or_else(Utc::now);

    let close = Decimal::try_from(close).map_err(|_| MarketDataError::ValidationFailed {
        message: format!("Invalid close price: {}", close),
    })?;

    let mut quote = Quote::new(symbol, timestamp, close, QUOTE_CURRENCY, PROVIDER_ID);
    quote.open = response.o.and_then(|v| Decimal::try_from(v).ok());
    quote.high = response.h.and_then(|v| Decimal::try_from(v).ok());
    quote.low = response.l.and_then(|v| Decimal::try_from(v).ok());
    quote.previous_close = response.pc.and_then(|v| Decimal::try_from(v).ok());
    Ok(quote)
}

/// Converts a /stock/candle body into quotes sorted by timestamp.
fn parse_candle_response(symbol: &str, text: &str) -> Result<Vec<Quote>, MarketDataError> {
    let response: CandleResponse =
        serde_json::from_str(text).map_err(|e| parse_error("candle", e))?;

    if response.s == "no_data" {
        return Err(MarketDataError::NoDataForRange);
    }

    if response.s != "ok" {
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: format!("Unexpected candle status: {}", response.s),
        });
    }

    let len = response.t.len();
    if response.c.len() != len
        || response.o.len() != len
        || response.h.len() != len
        || response.l.len() != len
    {
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: "Mismatched array lengths in candle response".to_string(),
        });
    }

    if len == 0 {
        return Err(MarketDataError::NoDataForRange);
    }

    let mut quotes = Vec::with_capacity(len);

    for i in 0..len {
        let timestamp = match Utc.timestamp_opt(response.t[i], 0).single() {
            Some(ts) => ts,
            None => {
                warn!("Invalid timestamp at index {}: {}", i, response.t[i]);
                continue;
            }
        };

        let close = match Decimal::try_from(response.c[i]) {
            Ok(d) => d,
            Err(_) => {
                warn!("Invalid close price at index {}: {}", i, response.c[i]);
                continue;
            }
        };

        let mut quote = Quote::new(symbol, timestamp, close, QUOTE_CURRENCY, PROVIDER_ID);
        quote.open = Decimal::try_from(response.o[i]).ok();
        quote.high = Decimal::try_from(response.h[i]).ok();
        quote.low = Decimal::try_from(response.l[i]).ok();
        quote.volume = response.v.get(i).and_then(|&v| Decimal::try_from(v).ok());
        quotes.push(quote);
    }

    quotes.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    Ok(quotes)
}

/// Converts a /search body into search results.
fn parse_search_response(text: &str) -> Result<Vec<SearchResult>, MarketDataError> {
    let response: SearchResponse =
        serde_json::from_str(text).map_err(|e| parse_error("search", e))?;

    Ok(response
        .result
        .into_iter()
        .map(|item| {
            SearchResult::new(
                item.symbol,
                item.description,
                map_security_type(&item.security_type),
            )
            .with_display_symbol(item.display_symbol)
        })
        .collect())
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_latest: true,
            supports_historical: true,
            supports_search: true,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 60, // Free tier limit
            max_concurrency: 4,
            min_delay: Duration::from_millis(100),
        }
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        debug!("Fetching latest quote for {} from Finnhub", symbol);
        let text = self.fetch("/quote", &[("symbol", symbol)]).await?;
        parse_quote_response(symbol, &text)
    }

    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        resolution: CandleResolution,
    ) -> Result<Vec<Quote>, MarketDataError> {
        if start > end {
            return Err(MarketDataError::ValidationFailed {
                message: format!("Start {} is after end {}", start, end),
            });
        }

        let from_ts = start.timestamp().to_string();
        let to_ts = end.timestamp().to_string();
        let params = [
            ("symbol", symbol),
            ("resolution", resolution.as_param()),
            ("from", from_ts.as_str()),
            ("to", to_ts.as_str()),
        ];

        let text = self.fetch("/stock/candle", &params).await?;
        let quotes = parse_candle_response(symbol, &text)?;

        debug!(
            "Finnhub: fetched {} {} candles for {} ({} to {})",
            quotes.len(),
            resolution.as_param(),
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        Ok(quotes)
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        debug!("Searching Finnhub for '{}'", query);
        let text = self.fetch("/search", &[("q", query)]).await?;
        let results = parse_search_response(&text)?;
        debug!("Finnhub: found {} search results for '{}'", results.len(), query);
        Ok(results)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Map Finnhub security type to a display asset type.
fn map_security_type(finnhub_type: &str) -> String {
    match finnhub_type.to_lowercase().as_str() {
        "common stock" | "stock" => "Stock".to_string(),
        "etf" | "etp" => "ETF".to_string(),
        "mutual fund" | "fund" => "Mutual Fund".to_string(),
        "adr" | "american depositary receipt" => "ADR".to_string(),
        "reit" => "REIT".to_string(),
        "preferred stock" | "preferred" => "Preferred Stock".to_string(),
        _ => finnhub_type.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
