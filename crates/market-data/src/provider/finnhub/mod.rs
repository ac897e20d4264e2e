//! Finnhub market data provider implementation.
//!
//! This module provides market data from Finnhub API:
//! - Price history via /stock/candle endpoint
//! - Financial metrics via /stock/metric endpoint
//! - Symbol search via /search endpoint
//! - Market and company news via /news and /company-news endpoints
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use self::models::{
    CandleResponse, ErrorResponse, MetricsResponse, NewsStory, SearchResponse,
};
use crate::errors::MarketDataError;
use crate::models::{
    sort_newest_first, NewsItem, NewsScope, PriceSample, SearchResult, SymbolMetrics,
};
use crate::provider::QuoteProvider;

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

/// Look-back window for company news.
const COMPANY_NEWS_DAYS: i64 = 7;

// ============================================================================
// Configuration
// ============================================================================

/// Candle width requested from /stock/candle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CandleResolution {
    #[default]
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl CandleResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1",
            Self::FiveMinutes => "5",
            Self::FifteenMinutes => "15",
            Self::ThirtyMinutes => "30",
            Self::Hourly => "60",
            Self::Daily => "D",
            Self::Weekly => "W",
            Self::Monthly => "M",
        }
    }
}

impl std::str::FromStr for CandleResolution {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1" => Ok(Self::OneMinute),
            "5" => Ok(Self::FiveMinutes),
            "15" => Ok(Self::FifteenMinutes),
            "30" => Ok(Self::ThirtyMinutes),
            "60" => Ok(Self::Hourly),
            "D" => Ok(Self::Daily),
            "W" => Ok(Self::Weekly),
            "M" => Ok(Self::Monthly),
            other => Err(MarketDataError::InvalidRequest(format!(
                "Unknown candle resolution: {}",
                other
            ))),
        }
    }
}

/// Settings for [`FinnhubProvider`].
#[derive(Clone, Debug)]
pub struct FinnhubConfig {
    pub api_key: String,
    pub base_url: String,
    pub resolution: CandleResolution,
    pub timeout: Duration,
}

impl FinnhubConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            resolution: CandleResolution::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub market data provider.
///
/// Free tier is limited to 60 API calls per minute; the provider does not
/// throttle on its own and reports HTTP 429 as [`MarketDataError::RateLimited`].
pub struct FinnhubProvider {
    client: Client,
    config: FinnhubConfig,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider with the given API key and default settings.
    pub fn new(api_key: String) -> Self {
        Self::with_config(FinnhubConfig::new(api_key))
    }

    pub fn with_config(config: FinnhubConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// Make a GET request to the Finnhub API.
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, MarketDataError> {
        let url = self.endpoint_url(endpoint);

        // API key travels as a header rather than a query param
        let request = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", &self.config.api_key)
            .query(params);

        debug!(
            "Finnhub request: {} with {} params",
            endpoint,
            params.len()
        );

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();

        // 403 is returned once the key's quota is exhausted
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Invalid or missing API key".to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        Ok(response.text().await?)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, MarketDataError> {
        let text = self.fetch(endpoint, params).await?;
        decode(endpoint, &text)
    }

    /// Fetch price history from /stock/candle endpoint.
    async fn fetch_candles(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceSample>, MarketDataError> {
        let from_ts = start.timestamp().to_string();
        let to_ts = end.timestamp().to_string();

        let params = [
            ("symbol", symbol),
            ("resolution", self.config.resolution.as_str()),
            ("from", from_ts.as_str()),
            ("to", to_ts.as_str()),
        ];

        let response: CandleResponse = self.fetch_json("/stock/candle", &params).await?;
        let samples = candles_to_samples(response)?;

        debug!(
            "Finnhub: fetched {} samples for {} ({} to {})",
            samples.len(),
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        Ok(samples)
    }
}

// ============================================================================
// QuoteProvider Implementation
// ============================================================================

#[async_trait]
impl QuoteProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_price_history(
        &self,
        symbol: &str,
        days_back: u32,
    ) -> Result<Vec<PriceSample>, MarketDataError> {
        let symbol = require_symbol(symbol)?;
        let end = Utc::now();
        let start = end - chrono::Duration::days(i64::from(days_back));

        debug!(
            "Fetching {} days of history for {} from Finnhub",
            days_back, symbol
        );

        self.fetch_candles(symbol, start, end).await
    }

    async fn fetch_metrics(&self, symbol: &str) -> Result<SymbolMetrics, MarketDataError> {
        let symbol = require_symbol(symbol)?;
        debug!("Fetching metrics for {} from Finnhub", symbol);

        let params = [("symbol", symbol), ("metric", "all")];
        let response: MetricsResponse = self.fetch_json("/stock/metric", &params).await?;

        metrics_from_response(symbol, response)
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MarketDataError::InvalidRequest(
                "Search query is empty".to_string(),
            ));
        }

        debug!("Searching Finnhub for '{}'", query);

        let params = [("q", query)];
        let response: SearchResponse = self.fetch_json("/search", &params).await?;

        let results: Vec<SearchResult> = response
            .result
            .into_iter()
            .map(|item| {
                SearchResult::new(
                    item.symbol,
                    item.display_symbol,
                    item.description,
                    item.security_type,
                )
            })
            .collect();

        debug!("Finnhub: found {} search results for '{}'", results.len(), query);

        Ok(results)
    }

    async fn fetch_news(&self, scope: &NewsScope) -> Result<Vec<NewsItem>, MarketDataError> {
        let stories: Vec<NewsStory> = match scope {
            NewsScope::AllMarkets => {
                debug!("Fetching top stories from Finnhub");
                self.fetch_json("/news", &[("category", "general")]).await?
            }
            NewsScope::ForSymbol(symbol) => {
                let symbol = require_symbol(symbol)?;
                let (from, to) = company_news_window(Utc::now());
                debug!("Fetching company news for {} ({} to {})", symbol, from, to);
                self.fetch_json(
                    "/company-news",
                    &[("symbol", symbol), ("from", from.as_str()), ("to", to.as_str())],
                )
                .await?
            }
        };

        Ok(stories.into_iter().filter_map(story_to_item).collect())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn require_symbol(symbol: &str) -> Result<&str, MarketDataError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(MarketDataError::InvalidRequest("Symbol is empty".to_string()));
    }
    Ok(symbol)
}

fn decode<T: DeserializeOwned>(endpoint: &str, text: &str) -> Result<T, MarketDataError> {
    serde_json::from_str(text).map_err(|e| {
        MarketDataError::decode(
            PROVIDER_ID,
            format!("Failed to parse {} response: {}", endpoint, e),
        )
    })
}

fn status_error(status: reqwest::StatusCode, body: &str) -> MarketDataError {
    if let Ok(ErrorResponse {
        error: Some(message),
    }) = serde_json::from_str::<ErrorResponse>(body)
    {
        return MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message,
        };
    }

    MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message: format!("HTTP {} - {}", status, body),
    }
}

/// `YYYY-MM-DD` bounds of the company news window ending at `now`.
fn company_news_window(now: DateTime<Utc>) -> (String, String) {
    let from = now - chrono::Duration::days(COMPANY_NEWS_DAYS);
    (
        from.format("%Y-%m-%d").to_string(),
        now.format("%Y-%m-%d").to_string(),
    )
}

/// Convert the parallel candle arrays into samples ordered newest-first.
fn candles_to_samples(response: CandleResponse) -> Result<Vec<PriceSample>, MarketDataError> {
    if response.s == "no_data" {
        return Err(MarketDataError::NoDataForRange);
    }

    if response.s != "ok" {
        return Err(MarketDataError::decode(
            PROVIDER_ID,
            format!("Unexpected candle status: {}", response.s),
        ));
    }

    let len = response.t.len();
    if response.c.len() != len
        || response.o.len() != len
        || response.h.len() != len
        || response.l.len() != len
    {
        return Err(MarketDataError::decode(
            PROVIDER_ID,
            "Mismatched array lengths in candle response",
        ));
    }

    if len == 0 {
        return Err(MarketDataError::NoDataForRange);
    }

    let mut samples = Vec::with_capacity(len);

    for i in 0..len {
        let timestamp = match Utc.timestamp_opt(response.t[i], 0).single() {
            Some(ts) => ts,
            None => {
                warn!("Invalid timestamp at index {}: {}", i, response.t[i]);
                continue;
            }
        };

        samples.push(PriceSample {
            timestamp,
            open: response.o[i],
            high: response.h[i],
            low: response.l[i],
            close: response.c[i],
            volume: response.v.get(i).copied().unwrap_or(0.0),
        });
    }

    sort_newest_first(&mut samples);

    Ok(samples)
}

fn metrics_from_response(
    symbol: &str,
    response: MetricsResponse,
) -> Result<SymbolMetrics, MarketDataError> {
    let table = response.metric.ok_or_else(|| {
        MarketDataError::SymbolNotFound(format!("No metrics for symbol: {}", symbol))
    })?;

    let metrics = SymbolMetrics {
        week_52_high: table.week_52_high,
        week_52_low: table.week_52_low,
        week_52_return: table.week_52_price_return_daily,
        beta: table.beta,
        ten_day_average_volume: table.ten_day_average_trading_volume,
    };

    // Finnhub answers unknown symbols with an empty metric object
    if metrics.is_empty() {
        return Err(MarketDataError::SymbolNotFound(format!(
            "No metrics for symbol: {}",
            symbol
        )));
    }

    Ok(metrics)
}

fn story_to_item(story: NewsStory) -> Option<NewsItem> {
    let published_at = match Utc.timestamp_opt(story.datetime, 0).single() {
        Some(ts) => ts,
        None => {
            warn!("Skipping story {} with invalid datetime {}", story.id, story.datetime);
            return None;
        }
    };

    Some(NewsItem {
        id: story.id,
        category: story.category,
        published_at,
        headline: story.headline,
        image: story.image,
        related: story.related,
        source: story.source,
        summary: story.summary,
        url: story.url,
    })
}

// ============================================================================
// Tests
// ============================================================================
