use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market data quote
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker the quote belongs to
    pub symbol: String,

    /// Timestamp of the quote (candle open for historical data)
    pub timestamp: DateTime<Utc>,

    /// Opening price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    /// High price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    /// Low price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    /// Closing/current price (required)
    pub close: Decimal,

    /// Previous session close, only present on latest quotes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<Decimal>,

    /// Trading volume
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,

    /// Quote currency
    pub currency: String,

    /// Source of the quote (FINNHUB, ...)
    pub source: String,
}

impl Quote {
    /// Create a new quote with minimal required fields
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        close: Decimal,
        currency: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            open: None,
            high: None,
            low: None,
            close,
            previous_close: None,
            volume: None,
            currency: currency.into(),
            source: source.into(),
        }
    }

    /// Attach open/high/low prices.
    pub fn with_range(mut self, open: Decimal, high: Decimal, low: Decimal) -> Self {
        self.open = Some(open);
        self.high = Some(high);
        self.low = Some(low);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_new() {
        let quote = Quote::new("AAPL", Utc::now(), dec!(150.25), "USD", "FINNHUB");
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.close, dec!(150.25));
        assert_eq!(quote.currency, "USD");
        assert!(quote.open.is_none());
        assert!(quote.previous_close.is_none());
    }

    #[test]
    fn test_quote_with_range() {
        let quote = Quote::new("AAPL", Utc::now(), dec!(150), "USD", "FINNHUB").with_range(
            dec!(148),
            dec!(152),
            dec!(147.5),
        );
        assert_eq!(quote.open, Some(dec!(148)));
        assert_eq!(quote.high, Some(dec!(152)));
        assert_eq!(quote.low, Some(dec!(147.5)));
    }

    #[test]
    fn test_quote_serializes_camel_case() {
        let mut quote = Quote::new("MSFT", Utc::now(), dec!(400), "USD", "FINNHUB");
        quote.previous_close = Some(dec!(398));
        let json = serde_json::to_value(&quote).unwrap();
        assert!(json.get("previousClose").is_some());
        assert!(json.get("open").is_none());
    }
}
