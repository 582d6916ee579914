//! Market data models
//!
//! - `quote` - Quote data (Quote)
//! - `search` - Search result data (SearchResult)
//! - `resolution` - Candle resolution for historical requests (CandleResolution)

mod quote;
mod resolution;
mod search;

pub use quote::Quote;
pub use resolution::CandleResolution;
pub use search::SearchResult;
