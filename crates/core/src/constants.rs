//! Configuration constants.

/// Days of history fetched for each watchlist row.
pub const DEFAULT_WATCHLIST_HISTORY_DAYS: u32 = 7;

/// Days of history fetched for the detail chart when none is supplied.
pub const DEFAULT_DETAIL_HISTORY_DAYS: u32 = 30;

/// Time zone used to bucket samples into calendar days.
pub const DEFAULT_MARKET_TIMEZONE: &str = "America/New_York";

/// Quiet period before a debounced search is sent.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Capacity of the broadcast channels carrying watchlist and aggregation events.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Display name used when the store has none for a symbol.
pub const UNKNOWN_COMPANY_NAME: &str = "Unknown";

/// Symbols written to the store on first run, with their display names.
pub const DEFAULT_WATCHLIST: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("SNAP", "Snap Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("AMZN", "Amazon.com Inc."),
    ("WORK", "Slack Technologies"),
    ("FB", "Facebook Inc."),
    ("GOOG", "Alphabet"),
    ("NVDA", "Nvidia Inc."),
    ("NKE", "Nike"),
    ("PINS", "Pinterest"),
];
