//! Search result models for symbol lookup.

use serde::{Deserialize, Serialize};

/// Result from a ticker/symbol search.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Symbol/ticker used for quote calls (e.g., "AAPL", "SHOP.TO")
    pub symbol: String,

    /// Symbol as shown to users
    pub display_symbol: String,

    /// Company or fund name (e.g., "APPLE INC")
    pub name: String,

    /// Security type (e.g., "Stock", "ETF")
    pub asset_type: String,
}

impl SearchResult {
    /// Create a new search result. The display symbol defaults to the symbol.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        asset_type: impl Into<String>,
    ) -> Self {
        let symbol = symbol.into();
        Self {
            display_symbol: symbol.clone(),
            symbol,
            name: name.into(),
            asset_type: asset_type.into(),
        }
    }

    /// Set the display symbol.
    pub fn with_display_symbol(mut self, display_symbol: impl Into<String>) -> Self {
        self.display_symbol = display_symbol.into();
        self
    }
}
