//! Detail view models.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use stockwatch_market_data::{NewsItem, PriceSample, SymbolMetrics};

use crate::constants::{DEFAULT_DETAIL_HISTORY_DAYS, UNKNOWN_COMPANY_NAME};
use crate::series::{
    chart_points, format_change, format_price_with, summarize_in, ChangeClass, NumberLocale,
    UNAVAILABLE,
};

/// Settings for the detail aggregator.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailConfig {
    /// Days of history fetched when the caller supplies none.
    pub history_days: u32,
    pub market_tz: Tz,
    pub locale: NumberLocale,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            history_days: DEFAULT_DETAIL_HISTORY_DAYS,
            market_tz: chrono_tz::America::New_York,
            locale: NumberLocale::default(),
        }
    }
}

/// What to open a detail view for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetailRequest {
    pub symbol: String,
    pub company_name: Option<String>,
    /// Series already at hand, e.g. from the watchlist cache. Skips the price fetch.
    pub series: Option<Vec<PriceSample>>,
}

impl DetailRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    pub fn with_series(mut self, series: Vec<PriceSample>) -> Self {
        self.series = Some(series);
        self
    }
}

/// One labelled metric, already formatted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRow {
    pub label: String,
    pub value: String,
}

impl MetricRow {
    fn new(label: &str, value: Option<f64>, locale: &NumberLocale) -> Self {
        Self {
            label: label.to_string(),
            value: value
                .map(|v| format_price_with(v, locale))
                .unwrap_or_else(|| UNAVAILABLE.to_string()),
        }
    }
}

/// Labelled rows for the five metrics, in display order.
pub fn metric_rows(metrics: &SymbolMetrics, locale: &NumberLocale) -> Vec<MetricRow> {
    vec![
        MetricRow::new("52W High", metrics.week_52_high, locale),
        MetricRow::new("52W Low", metrics.week_52_low, locale),
        MetricRow::new("52W Return", metrics.week_52_return, locale),
        MetricRow::new("Beta", metrics.beta, locale),
        MetricRow::new("10D Volume", metrics.ten_day_average_volume, locale),
    ]
}

/// Chart input for the detail view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailChart {
    /// Closes in chronological order.
    pub points: Vec<f64>,
    pub change_class: ChangeClass,
    pub show_legend: bool,
    pub show_axis: bool,
}

/// Render-ready state of one symbol's detail view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailSnapshot {
    pub symbol: String,
    pub company_name: String,
    /// Newest-first; empty when unavailable.
    pub series: Vec<PriceSample>,
    /// `None` until loaded, or when the fetch failed.
    pub metrics: Option<SymbolMetrics>,
    pub metric_rows: Vec<MetricRow>,
    pub news: Vec<NewsItem>,
    pub chart: DetailChart,
    pub latest_price: Option<f64>,
    pub change: Option<f64>,
    pub display_price: String,
    pub display_change: String,
    pub is_watched: bool,
    /// Set once the price/metrics join has settled.
    pub loaded: bool,
    /// Set once the news fetch has settled.
    pub news_loaded: bool,
}

impl DetailSnapshot {
    /// Build a snapshot with every derived field computed from `series` and `metrics`.
    pub fn new(
        symbol: impl Into<String>,
        company_name: Option<String>,
        series: Vec<PriceSample>,
        metrics: Option<SymbolMetrics>,
        config: &DetailConfig,
    ) -> Self {
        let mut snapshot = Self {
            symbol: symbol.into(),
            company_name: company_name.unwrap_or_else(|| UNKNOWN_COMPANY_NAME.to_string()),
            series: Vec::new(),
            metrics: None,
            metric_rows: Vec::new(),
            news: Vec::new(),
            chart: DetailChart {
                points: Vec::new(),
                change_class: ChangeClass::Neutral,
                show_legend: true,
                show_axis: true,
            },
            latest_price: None,
            change: None,
            display_price: UNAVAILABLE.to_string(),
            display_change: UNAVAILABLE.to_string(),
            is_watched: false,
            loaded: false,
            news_loaded: false,
        };
        snapshot.set_series(series, config);
        snapshot.set_metrics(metrics, config);
        snapshot
    }

    pub(crate) fn set_series(&mut self, series: Vec<PriceSample>, config: &DetailConfig) {
        let summary = summarize_in(&series, &config.market_tz);
        self.latest_price = summary.latest_close;
        self.change = summary.change;
        self.display_price = summary
            .latest_close
            .map(|price| format_price_with(price, &config.locale))
            .unwrap_or_else(|| UNAVAILABLE.to_string());
        self.display_change = format_change(summary.change, &config.locale);
        self.chart.points = chart_points(&series);
        self.chart.change_class = summary.change_class;
        self.series = series;
    }

    pub(crate) fn set_metrics(&mut self, metrics: Option<SymbolMetrics>, config: &DetailConfig) {
        self.metric_rows = metrics
            .as_ref()
            .map(|m| metric_rows(m, &config.locale))
            .unwrap_or_default();
        self.metrics = metrics;
    }
}
