//! Stockwatch Core - Watchlist aggregation, derived metrics, and view models.
//!
//! This crate contains the application logic of stockwatch. It depends on
//! the `stockwatch-market-data` crate for the `QuoteProvider` contract and
//! defines the `WatchlistStore` trait that persistence backends implement.
//!
//! # Modules
//!
//! - [`series`] - Pure derivations (percentage change, chart points) and formatting
//! - [`watchlist`] - Store, change events, and the watchlist aggregator
//! - [`detail`] - The single-symbol detail aggregator
//! - [`news`] - News feed loading and presentation
//! - [`search`] - Symbol search with debouncing

pub mod constants;
pub mod detail;
pub mod errors;
pub mod news;
pub mod search;
pub mod series;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod test_support;

pub use detail::{DetailAggregator, DetailConfig, DetailRequest, DetailSession, DetailSnapshot};
pub use news::{NewsFeed, NewsStoryView};
pub use search::SymbolSearch;
pub use series::{ChangeClass, NumberLocale};
pub use watchlist::{
    AggregationEvent, InMemoryWatchlistStore, JsonFileWatchlistStore, WatchlistAggregator,
    WatchlistConfig, WatchlistEntry, WatchlistEvent, WatchlistSnapshot, WatchlistStore,
    WatchlistSubscription,
};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
