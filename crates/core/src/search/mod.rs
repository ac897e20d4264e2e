//! Symbol search with optional debouncing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use stockwatch_market_data::{QuoteProvider, SearchResult};

use crate::constants::DEFAULT_SEARCH_DEBOUNCE_MS;

pub struct SymbolSearch {
    provider: Arc<dyn QuoteProvider>,
    debounce: Duration,
    /// Bumped by every debounced query; a query only answers if it is still current.
    generation: AtomicU64,
}

impl SymbolSearch {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self::with_debounce(provider, Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS))
    }

    pub fn with_debounce(provider: Arc<dyn QuoteProvider>, debounce: Duration) -> Self {
        Self {
            provider,
            debounce,
            generation: AtomicU64::new(0),
        }
    }

    /// Search for symbols matching `query`.
    ///
    /// Blank queries return nothing without calling the provider. Failures are
    /// logged and yield an empty list.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.provider.search_symbols(query).await {
            Ok(results) => {
                debug!("Search '{}' returned {} results", query, results.len());
                results
            }
            Err(e) => {
                warn!("Search '{}' failed [{}]: {}", query, e.kind(), e);
                Vec::new()
            }
        }
    }

    /// Company name for an exact symbol match, taken from the search results.
    ///
    /// Matches `symbol` or `display_symbol` case-insensitively. Returns `None`
    /// when nothing matches or the match has no description.
    pub async fn company_name(&self, symbol: &str) -> Option<String> {
        let symbol = symbol.trim();
        self.search(symbol)
            .await
            .into_iter()
            .find(|result| {
                result.symbol.eq_ignore_ascii_case(symbol)
                    || result.display_symbol.eq_ignore_ascii_case(symbol)
            })
            .map(|result| result.description.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    /// Search after a quiet period.
    ///
    /// Returns `None` when a later call to this method superseded the query,
    /// either while waiting or while the request was in flight.
    pub async fn search_debounced(&self, query: &str) -> Option<Vec<SearchResult>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.debounce).await;
        if !self.is_current(generation) {
            return None;
        }

        let results = self.search(query).await;
        self.is_current(generation).then_some(results)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
