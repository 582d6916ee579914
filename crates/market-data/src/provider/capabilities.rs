//! Provider capabilities and rate limiting configuration.

use std::time::Duration;

/// Describes what a market data provider can do.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Whether the provider can return the latest quote for a symbol.
    pub supports_latest: bool,

    /// Whether the provider supports historical candle fetching.
    pub supports_historical: bool,

    /// Whether the provider supports symbol search.
    pub supports_search: bool,
}

/// Rate limiting configuration for a provider.
///
/// Callers use `max_concurrency` to bound fan-out when fetching many symbols.
#[derive(Clone, Debug)]
pub struct RateLimit {
    /// Maximum requests allowed per minute.
    pub requests_per_minute: u32,

    /// Maximum concurrent requests to this provider.
    pub max_concurrency: usize,

    /// Minimum delay between requests.
    pub min_delay: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            max_concurrency: 5,
            min_delay: Duration::from_millis(100),
        }
    }
}
