//! Worthline Market Data Crate
//!
//! Provider-agnostic access to instrument prices used to value stock positions
//! on top of the reconstructed net worth history.
//!
//! # Overview
//!
//! - [`MarketDataProvider`] is the seam every quote source implements.
//! - [`FinnhubProvider`] talks to the Finnhub REST API (latest quote, candles, search).
//! - [`Quote`] and [`SearchResult`] are the provider-neutral payloads.
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +---------------------+
//! |  worthline-core  | --> | MarketDataProvider  |  (trait object)
//! +------------------+     +---------------------+
//!                                    |
//!                                    v
//!                          +------------------+
//!                          | FinnhubProvider  |  (HTTP, X-Finnhub-Token)
//!                          +------------------+
//!                                    |
//!                                    v
//!                          +------------------+
//!                          |  Quote / Search  |
//!                          +------------------+
//! ```

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{CandleResolution, Quote, SearchResult};
pub use provider::finnhub::FinnhubProvider;
pub use provider::{MarketDataProvider, ProviderCapabilities, RateLimit};
