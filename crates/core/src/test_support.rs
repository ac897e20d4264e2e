//! Shared test doubles for the aggregator and service tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use stockwatch_market_data::{
    MarketDataError, NewsItem, NewsScope, PriceSample, QuoteProvider, SearchResult, SymbolMetrics,
};

/// Operations recorded by [`MockQuoteProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderCall {
    PriceHistory { symbol: String, days_back: u32 },
    Metrics(String),
    Search(String),
    News(NewsScope),
}

impl ProviderCall {
    fn operation(&self) -> &'static str {
        match self {
            Self::PriceHistory { .. } => "price_history",
            Self::Metrics(_) => "metrics",
            Self::Search(_) => "search",
            Self::News(_) => "news",
        }
    }
}

/// Provider double that serves canned data and records every call.
///
/// Symbols listed through [`fail_symbol`](Self::fail_symbol) fail their price
/// and metrics fetches; operations listed through
/// [`fail_operation`](Self::fail_operation) fail for every input.
#[derive(Clone, Default)]
pub struct MockQuoteProvider {
    series: Arc<Mutex<HashMap<String, Vec<PriceSample>>>>,
    metrics: Arc<Mutex<HashMap<String, SymbolMetrics>>>,
    search_results: Arc<Mutex<Vec<SearchResult>>>,
    news: Arc<Mutex<HashMap<NewsScope, Vec<NewsItem>>>>,
    failing_symbols: Arc<Mutex<HashSet<String>>>,
    failing_operations: Arc<Mutex<HashSet<&'static str>>>,
    delays: Arc<Mutex<HashMap<&'static str, Duration>>>,
    calls: Arc<Mutex<Vec<ProviderCall>>>,
}

impl MockQuoteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(self, symbol: &str, series: Vec<PriceSample>) -> Self {
        self.series
            .lock()
            .unwrap()
            .insert(symbol.to_string(), series);
        self
    }

    pub fn with_metrics(self, symbol: &str, metrics: SymbolMetrics) -> Self {
        self.metrics
            .lock()
            .unwrap()
            .insert(symbol.to_string(), metrics);
        self
    }

    pub fn with_search_results(self, results: Vec<SearchResult>) -> Self {
        *self.search_results.lock().unwrap() = results;
        self
    }

    pub fn with_news(self, scope: NewsScope, items: Vec<NewsItem>) -> Self {
        self.news.lock().unwrap().insert(scope, items);
        self
    }

    pub fn fail_symbol(self, symbol: &str) -> Self {
        self.failing_symbols
            .lock()
            .unwrap()
            .insert(symbol.to_string());
        self
    }

    /// Fail `operation` (`price_history`, `metrics`, `search`, `news`) for every input.
    pub fn fail_operation(self, operation: &'static str) -> Self {
        self.failing_operations.lock().unwrap().insert(operation);
        self
    }

    /// Delay `operation` by `delay` before answering.
    pub fn delay_operation(self, operation: &'static str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(operation, delay);
        self
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn price_history_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::PriceHistory { symbol, .. } => Some(symbol),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    async fn record(&self, call: ProviderCall) -> Result<(), MarketDataError> {
        let operation = call.operation();
        let symbol = match &call {
            ProviderCall::PriceHistory { symbol, .. } | ProviderCall::Metrics(symbol) => {
                Some(symbol.clone())
            }
            _ => None,
        };
        self.calls.lock().unwrap().push(call);

        let delay = self.delays.lock().unwrap().get(operation).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let op_fails = self.failing_operations.lock().unwrap().contains(operation);
        let symbol_fails = symbol
            .map(|s| self.failing_symbols.lock().unwrap().contains(&s))
            .unwrap_or(false);
        if op_fails || symbol_fails {
            return Err(MarketDataError::ProviderError {
                provider: "MOCK".to_string(),
                message: format!("{} failed", operation),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn fetch_price_history(
        &self,
        symbol: &str,
        days_back: u32,
    ) -> Result<Vec<PriceSample>, MarketDataError> {
        self.record(ProviderCall::PriceHistory {
            symbol: symbol.to_string(),
            days_back,
        })
        .await?;
        self.series
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    async fn fetch_metrics(&self, symbol: &str) -> Result<SymbolMetrics, MarketDataError> {
        self.record(ProviderCall::Metrics(symbol.to_string())).await?;
        Ok(self
            .metrics
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .unwrap_or_default())
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        self.record(ProviderCall::Search(query.to_string())).await?;
        let query = query.to_uppercase();
        Ok(self
            .search_results
            .lock()
            .unwrap()
            .iter()
            .filter(|result| {
                result.symbol.contains(&query) || result.description.to_uppercase().contains(&query)
            })
            .cloned()
            .collect())
    }

    async fn fetch_news(&self, scope: &NewsScope) -> Result<Vec<NewsItem>, MarketDataError> {
        self.record(ProviderCall::News(scope.clone())).await?;
        Ok(self
            .news
            .lock()
            .unwrap()
            .get(scope)
            .cloned()
            .unwrap_or_default())
    }
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

/// Two-day newest-first series moving from `prior` to `latest`.
pub fn two_day_series(prior: f64, latest: f64) -> Vec<PriceSample> {
    vec![
        PriceSample::close_only(at(5, 19), latest),
        PriceSample::close_only(at(5, 15), latest),
        PriceSample::close_only(at(4, 19), prior),
    ]
}

pub fn news_item(id: i64, headline: &str) -> NewsItem {
    NewsItem {
        id,
        category: "company".to_string(),
        published_at: at(8, 14),
        headline: headline.to_string(),
        image: String::new(),
        related: "AAPL".to_string(),
        source: "Reuters".to_string(),
        summary: String::new(),
        url: format!("https://example.com/news/{}", id),
    }
}
