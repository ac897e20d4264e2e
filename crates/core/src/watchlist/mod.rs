//! Watchlist module.
//!
//! - [`model`] - Rows, snapshots, and aggregator settings
//! - [`store`] - The `WatchlistStore` trait with in-memory and JSON-file implementations
//! - [`events`] - Store change notifications and aggregation progress events
//! - [`aggregator`] - The fetch/join/derive pass that turns symbols into rows
//!
//! # Architecture
//!
//! ```text
//! WatchlistStore ──WatchlistEvent──▶ WatchlistAggregator ──AggregationEvent──▶ UI
//!                                          │
//!                                    QuoteProvider
//! ```

pub mod aggregator;
pub mod events;
pub mod model;
pub mod store;

#[cfg(test)]
mod aggregator_tests;

pub use aggregator::{WatchlistAggregator, WatchlistSubscription};
pub use events::{AggregationEvent, EventBus, WatchlistEvent};
pub use model::{WatchlistConfig, WatchlistEntry, WatchlistSnapshot};
pub use store::{normalize_symbol, InMemoryWatchlistStore, JsonFileWatchlistStore, WatchlistStore};
