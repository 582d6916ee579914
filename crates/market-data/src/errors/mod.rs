//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No data available for the requested date range.
    /// The symbol exists but has no candles in the specified period.
    #[error("No data for date range")]
    NoDataForRange,

    /// The provider rate limited the request (HTTP 429, or 403 on quota exhaustion).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that failed validation checks.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// The provider does not implement the requested operation.
    #[error("{operation} is not supported by {provider}")]
    NotSupported {
        /// Operation name, e.g. "search"
        operation: String,
        /// The provider that lacks the operation
        provider: String,
    },

    /// No provider is configured (for example, the API key is missing).
    #[error("No providers available")]
    NoProvidersAvailable,

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns true when the same request may succeed later without changes.
    ///
    /// Rate limits, timeouts and transport failures are transient. Unknown
    /// symbols, empty ranges and configuration problems are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_is_transient() {
        let error = MarketDataError::RateLimited {
            provider: "FINNHUB".to_string(),
        };
        assert!(error.is_transient());
    }

    #[test]
    fn test_timeout_is_transient() {
        let error = MarketDataError::Timeout {
            provider: "FINNHUB".to_string(),
        };
        assert!(error.is_transient());
    }

    #[test]
    fn test_symbol_not_found_is_terminal() {
        let error = MarketDataError::SymbolNotFound("NOPE".to_string());
        assert!(!error.is_transient());
    }

    #[test]
    fn test_no_providers_is_terminal() {
        assert!(!MarketDataError::NoProvidersAvailable.is_transient());
    }

    #[test]
    fn test_not_supported_message() {
        let error = MarketDataError::NotSupported {
            operation: "search".to_string(),
            provider: "FINNHUB".to_string(),
        };
        assert_eq!(error.to_string(), "search is not supported by FINNHUB");
    }
}
