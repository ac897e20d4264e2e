//! Watchlist view models.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use stockwatch_market_data::PriceSample;

use crate::constants::{DEFAULT_WATCHLIST_HISTORY_DAYS, UNKNOWN_COMPANY_NAME};
use crate::series::{
    chart_points, format_change, format_price_with, summarize_in, ChangeClass, NumberLocale,
};

/// Settings for the watchlist aggregator.
#[derive(Clone, Debug, PartialEq)]
pub struct WatchlistConfig {
    /// Days of history fetched per symbol.
    pub history_days: u32,
    /// Zone used to bucket samples into calendar days.
    pub market_tz: Tz,
    pub locale: NumberLocale,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            history_days: DEFAULT_WATCHLIST_HISTORY_DAYS,
            market_tz: chrono_tz::America::New_York,
            locale: NumberLocale::default(),
        }
    }
}

/// One row of the watchlist.
///
/// Every derived field is a function of `series` alone, so an entry built from
/// an empty series is the placeholder row: zero price, no change, neutral class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub symbol: String,
    pub display_name: String,
    /// Newest-first samples; empty until a fetch succeeds.
    pub series: Vec<PriceSample>,
    pub latest_price: f64,
    /// `None` when no change can be derived.
    pub change: Option<f64>,
    pub change_class: ChangeClass,
    pub display_price: String,
    pub display_change: String,
    /// Closes in chronological order.
    pub chart_points: Vec<f64>,
}

impl WatchlistEntry {
    pub fn new(
        symbol: impl Into<String>,
        display_name: Option<String>,
        series: Vec<PriceSample>,
        config: &WatchlistConfig,
    ) -> Self {
        let summary = summarize_in(&series, &config.market_tz);
        let latest_price = summary.latest_close.unwrap_or(0.0);

        Self {
            symbol: symbol.into(),
            display_name: display_name.unwrap_or_else(|| UNKNOWN_COMPANY_NAME.to_string()),
            latest_price,
            change: summary.change,
            change_class: summary.change_class,
            display_price: format_price_with(latest_price, &config.locale),
            display_change: format_change(summary.change, &config.locale),
            chart_points: chart_points(&series),
            series,
        }
    }

    pub fn placeholder(
        symbol: impl Into<String>,
        display_name: Option<String>,
        config: &WatchlistConfig,
    ) -> Self {
        Self::new(symbol, display_name, Vec::new(), config)
    }

    pub fn is_placeholder(&self) -> bool {
        self.series.is_empty()
    }
}

/// Output of one aggregation pass, sorted by symbol.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistSnapshot {
    pub pass: u64,
    pub entries: Vec<WatchlistEntry>,
}

impl WatchlistSnapshot {
    /// Build a snapshot, sorting entries by symbol ascending.
    pub fn new(pass: u64, mut entries: Vec<WatchlistEntry>) -> Self {
        entries.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Self { pass, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&WatchlistEntry> {
        self.entries.iter().find(|entry| entry.symbol == symbol)
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.symbol.as_str()).collect()
    }
}
