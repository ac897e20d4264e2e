//! Finnhub API response structures.

use serde::Deserialize;

/// Response from /stock/candle endpoint
#[derive(Debug, Deserialize)]
pub(super) struct CandleResponse {
    /// Status: "ok" or "no_data"
    pub s: String,
    /// Close prices
    #[serde(default)]
    pub c: Vec<f64>,
    /// High prices
    #[serde(default)]
    pub h: Vec<f64>,
    /// Low prices
    #[serde(default)]
    pub l: Vec<f64>,
    /// Open prices
    #[serde(default)]
    pub o: Vec<f64>,
    /// Volume
    #[serde(default)]
    pub v: Vec<f64>,
    /// Timestamps (Unix)
    #[serde(default)]
    pub t: Vec<i64>,
}

/// Response from /stock/metric endpoint
#[derive(Debug, Deserialize)]
pub(super) struct MetricsResponse {
    /// Metric table; absent for unknown symbols
    #[serde(default)]
    pub metric: Option<MetricTable>,
    // Note: series, metricType and symbol exist but are not used
}

/// The subset of the `metric` table we read
#[derive(Debug, Default, Deserialize)]
pub(super) struct MetricTable {
    #[serde(rename = "52WeekHigh")]
    pub week_52_high: Option<f64>,
    #[serde(rename = "52WeekLow")]
    pub week_52_low: Option<f64>,
    #[serde(rename = "52WeekPriceReturnDaily")]
    pub week_52_price_return_daily: Option<f64>,
    pub beta: Option<f64>,
    #[serde(rename = "10DayAverageTradingVolume")]
    pub ten_day_average_trading_volume: Option<f64>,
}

/// Response from /search endpoint
#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    /// Search results
    #[serde(default)]
    pub result: Vec<SearchItem>,
    // Note: count field exists but we use result.len() instead
}

/// Individual search result item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchItem {
    /// Full description/name
    pub description: String,
    /// Display symbol
    pub display_symbol: String,
    /// Symbol for API calls
    pub symbol: String,
    /// Security type (e.g., "Common Stock", "ETF")
    #[serde(rename = "type")]
    pub security_type: String,
}

/// Article from /news and /company-news endpoints
#[derive(Debug, Deserialize)]
pub(super) struct NewsStory {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub category: String,
    /// Publication time (Unix)
    pub datetime: i64,
    pub headline: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub related: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub summary: String,
    pub url: String,
}

/// Error response from Finnhub
#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponse {
    pub error: Option<String>,
}
