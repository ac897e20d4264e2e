//! Series derivation and display formatting.
//!
//! - [`derivation`] - Percentage change, change classification, chart points
//! - [`format`] - Locale-aware price and percentage formatting
//!
//! Everything here is synchronous and free of I/O.

pub mod derivation;
pub mod format;

pub use derivation::{
    chart_points, derive_change, latest_close, percentage_change, percentage_change_in,
    summarize_in, ChangeClass, SeriesSummary,
};
pub use format::{
    format_change, format_percentage, format_percentage_with, format_price, format_price_with,
    NumberLocale, UNAVAILABLE,
};
