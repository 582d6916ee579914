/// Decimal precision for stored amounts
pub const DECIMAL_PRECISION: u32 = 6;

/// Default transaction category
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Default account for transactions and positions
pub const DEFAULT_ACCOUNT: &str = "General";

/// Default size of the recent valuations list and the activity feed
pub const DEFAULT_RECENT_LIMIT: usize = 8;

/// Maximum number of aggregated positions priced across the snapshot history
pub const MAX_HISTORY_POSITIONS: usize = 12;

/// Number of data rows returned by a CSV import preview
pub const CSV_PREVIEW_ROWS: usize = 10;
