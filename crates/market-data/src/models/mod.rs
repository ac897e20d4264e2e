//! Market data models
//!
//! This module contains the data types exchanged with providers:
//! - `price` - OHLCV samples (PriceSample) and ordering helpers
//! - `metrics` - Financial metrics (SymbolMetrics)
//! - `search` - Search result data (SearchResult)
//! - `news` - News articles (NewsItem) and the stream selector (NewsScope)

mod metrics;
mod news;
mod price;
mod search;

pub use metrics::SymbolMetrics;
pub use news::{NewsItem, NewsScope};
pub use price::{sort_newest_first, PriceSample};
pub use search::SearchResult;
