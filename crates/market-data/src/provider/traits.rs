//! Quote provider trait definitions.
//!
//! This module defines the core `QuoteProvider` trait that all
//! market data sources must implement.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{NewsItem, NewsScope, PriceSample, SearchResult, SymbolMetrics};

/// Trait for market data providers.
///
/// Every call is single-shot and independently fallible. Retries, paging
/// and rate-limit backoff are left to the transport.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use stockwatch_market_data::provider::QuoteProvider;
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl QuoteProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     // ... implement price history and metrics
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "FINNHUB". Used for logging.
    fn id(&self) -> &'static str;

    /// Fetch the price history of a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The ticker to fetch
    /// * `days_back` - Size of the window ending now, in days
    ///
    /// # Returns
    ///
    /// Samples ordered newest-first, or a `MarketDataError` on failure.
    async fn fetch_price_history(
        &self,
        symbol: &str,
        days_back: u32,
    ) -> Result<Vec<PriceSample>, MarketDataError>;

    /// Fetch financial metrics for a symbol.
    async fn fetch_metrics(&self, symbol: &str) -> Result<SymbolMetrics, MarketDataError>;

    /// Search for symbols matching a free-text query.
    ///
    /// Default implementation returns `NotSupported`.
    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let _ = query;
        Err(MarketDataError::NotSupported {
            operation: "search".to_string(),
            provider: self.id().to_string(),
        })
    }

    /// Fetch news articles for a scope.
    ///
    /// Default implementation returns `NotSupported`.
    async fn fetch_news(&self, scope: &NewsScope) -> Result<Vec<NewsItem>, MarketDataError> {
        let _ = scope;
        Err(MarketDataError::NotSupported {
            operation: "news".to_string(),
            provider: self.id().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;

    struct PricesOnly;

    #[async_trait]
    impl QuoteProvider for PricesOnly {
        fn id(&self) -> &'static str {
            "PRICES_ONLY"
        }

        async fn fetch_price_history(
            &self,
            _symbol: &str,
            _days_back: u32,
        ) -> Result<Vec<PriceSample>, MarketDataError> {
            Ok(Vec::new())
        }

        async fn fetch_metrics(&self, _symbol: &str) -> Result<SymbolMetrics, MarketDataError> {
            Ok(SymbolMetrics::default())
        }
    }

    #[tokio::test]
    async fn test_optional_operations_default_to_not_supported() {
        let provider = PricesOnly;

        let err = provider.search_symbols("AAPL").await.unwrap_err();
        assert!(matches!(
            err,
            MarketDataError::NotSupported { ref operation, ref provider }
                if operation == "search" && provider == "PRICES_ONLY"
        ));
        assert_eq!(err.kind(), FailureKind::NotFound);

        let err = provider.fetch_news(&NewsScope::AllMarkets).await.unwrap_err();
        assert!(matches!(err, MarketDataError::NotSupported { .. }));
    }
}
