//! Stockwatch Market Data Crate
//!
//! This crate provides provider-agnostic market data fetching for the
//! stockwatch workspace.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Price history (OHLCV samples, newest-first)
//! - Financial metrics (52-week range and return, beta, average volume)
//! - Symbol search
//! - Market-wide and per-company news
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   Domain Layer   |  (stockwatch-core aggregators)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |  QuoteProvider   |  (trait, injected as Arc<dyn QuoteProvider>)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | FinnhubProvider  |  (REST transport)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`PriceSample`] - One OHLCV data point
//! - [`SymbolMetrics`] - Financial metrics for a symbol
//! - [`SearchResult`] - Symbol search hit
//! - [`NewsItem`] / [`NewsScope`] - News articles and the stream they come from
//! - [`MarketDataError`] / [`FailureKind`] - Provider failures and their classification

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{FailureKind, MarketDataError};

// Re-export all public types from models
pub use models::{
    sort_newest_first, NewsItem, NewsScope, PriceSample, SearchResult, SymbolMetrics,
};

// Re-export provider types
pub use provider::finnhub::{CandleResolution, FinnhubConfig, FinnhubProvider};
pub use provider::QuoteProvider;
