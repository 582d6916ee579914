//! Quotes module - market prices for stock positions.
//!
//! ```text
//! PositionService / NetWorthService → QuoteService → MarketDataProvider (market-data crate)
//! ```
//!
//! The service is optional at runtime: without a configured provider every
//! call fails with `NoProvidersAvailable` and callers fall back to cost basis.

mod quotes_service;
mod quotes_traits;

#[cfg(test)]
mod quotes_service_tests;

pub use quotes_service::QuoteService;
pub use quotes_traits::QuoteServiceTrait;

pub use worthline_market_data::{CandleResolution, Quote, SearchResult};
