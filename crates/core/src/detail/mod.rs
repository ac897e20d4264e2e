//! Detail view for a single symbol.
//!
//! - [`model`] - Request, snapshot, metric rows, and settings
//! - [`aggregator`] - Joins price history and metrics, streams news alongside

pub mod aggregator;
pub mod model;


pub use aggregator::{DetailAggregator, DetailSession};
pub use model::{metric_rows, DetailChart, DetailConfig, DetailRequest, DetailSnapshot, MetricRow};
