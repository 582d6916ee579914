use serde::{Deserialize, Serialize};

/// Candle width for historical price requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CandleResolution {
    #[default]
    #[serde(rename = "D")]
    Daily,
    #[serde(rename = "W")]
    Weekly,
    #[serde(rename = "M")]
    Monthly,
}

impl CandleResolution {
    /// Query parameter value understood by candle endpoints.
    pub fn as_param(&self) -> &'static str {
        match self {
            CandleResolution::Daily => "D",
            CandleResolution::Weekly => "W",
            CandleResolution::Monthly => "M",
        }
    }

    /// Parses "D", "W" or "M" (case-insensitive). Anything else is daily.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "W" => CandleResolution::Weekly,
            "M" => CandleResolution::Monthly,
            _ => CandleResolution::Daily,
        }
    }
}
