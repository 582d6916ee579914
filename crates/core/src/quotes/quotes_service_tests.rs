//! Unit tests for the quote service.

use super::*;
use crate::errors::Error;
use crate::utils::Month;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};
use worthline_market_data::{
    MarketDataError, MarketDataProvider, ProviderCapabilities, RateLimit,
};

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockProvider {
    requested: Mutex<Vec<(String, DateTime<Utc>, DateTime<Utc>)>>,
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_latest: true,
            supports_historical: true,
            supports_search: false,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        match symbol {
            "AAPL" => Ok(Quote::new(symbol, Utc::now(), dec!(190.5), "USD", "MOCK")),
            "MSFT" => Ok(Quote::new(symbol, Utc::now(), dec!(410), "USD", "MOCK")),
            _ => Err(MarketDataError::SymbolNotFound(symbol.to_string())),
        }
    }

    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        _resolution: CandleResolution,
    ) -> Result<Vec<Quote>, MarketDataError> {
        self.requested
            .lock()
            .unwrap()
            .push((symbol.to_string(), start, end));
        if symbol == "EMPTY" {
            return Err(MarketDataError::NoDataForRange);
        }
        let candle = |y, m, d, close| {
            Quote::new(
                symbol,
                Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
                close,
                "USD",
                "MOCK",
            )
        };
        Ok(vec![
            candle(2023, 12, 1, dec!(90)),
            candle(2024, 1, 1, dec!(100)),
            candle(2024, 1, 31, dec!(105)),
            candle(2024, 3, 1, dec!(120)),
        ])
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_disabled_service_reports_no_providers() {
    let service = QuoteService::new(None);
    assert!(!service.is_enabled());

    let err = service.get_latest_quote("AAPL").await.unwrap_err();
    assert!(matches!(
        err,
        Error::MarketData(MarketDataError::NoProvidersAvailable)
    ));
    assert!(service
        .get_latest_prices(&["AAPL".to_string()])
        .await
        .is_empty());
}

#[tokio::test]
async fn test_latest_quote_normalizes_symbol() {
    let service = QuoteService::new(Some(Arc::new(MockProvider::default())));
    let quote = service.get_latest_quote(" aapl ").await.unwrap();
    assert_eq!(quote.close, dec!(190.5));
    assert!(matches!(
        service.get_latest_quote("  ").await,
        Err(Error::Validation(_))
    ));
}

#[tokio::test]
async fn test_monthly_closes_bucket_and_clip() {
    let provider = Arc::new(MockProvider::default());
    let service = QuoteService::new(Some(provider.clone()));

    let start = Month::new(2024, 1).unwrap();
    let end = Month::new(2024, 3).unwrap();
    let closes = service.get_monthly_closes("AAPL", start, end).await.unwrap();

    assert_eq!(closes.len(), 2);
    assert_eq!(closes[&start], dec!(105));
    assert_eq!(closes[&end], dec!(120));
    assert!(!closes.contains_key(&Month::new(2024, 2).unwrap()));

    let requested = provider.requested.lock().unwrap();
    assert_eq!(requested[0].1, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(requested[0].2, Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap());
}

#[tokio::test]
async fn test_monthly_closes_empty_range_is_empty_map() {
    let service = QuoteService::new(Some(Arc::new(MockProvider::default())));
    let closes = service
        .get_monthly_closes("EMPTY", Month::new(2024, 1).unwrap(), Month::new(2024, 2).unwrap())
        .await
        .unwrap();
    assert!(closes.is_empty());
}

#[tokio::test]
async fn test_latest_prices_skip_failures() {
    let service = QuoteService::new(Some(Arc::new(MockProvider::default())));
    let prices = service
        .get_latest_prices(&["AAPL".to_string(), "NOPE".to_string(), "MSFT".to_string()])
        .await;
    assert_eq!(prices.len(), 2);
    assert_eq!(prices["MSFT"], dec!(410));
    assert!(!prices.contains_key("NOPE"));
}

#[tokio::test]
async fn test_monthly_closes_batch_tolerates_failures() {
    let service = QuoteService::new(Some(Arc::new(MockProvider::default())));
    let start = Month::new(2024, 1).unwrap();
    let end = Month::new(2024, 3).unwrap();
    let batch = service
        .get_monthly_closes_batch(&["AAPL".to_string(), "EMPTY".to_string()], start, end)
        .await;
    assert_eq!(batch.len(), 2);
    assert_eq!(batch["AAPL"].len(), 2);
    assert!(batch["EMPTY"].is_empty());
}

#[tokio::test]
async fn test_search_uses_provider_default() {
    let service = QuoteService::new(Some(Arc::new(MockProvider::default())));
    let err = service.search_symbols("apple").await.unwrap_err();
    assert!(matches!(
        err,
        Error::MarketData(MarketDataError::NotSupported { .. })
    ));
}
