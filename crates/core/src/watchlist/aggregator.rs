//! Watchlist aggregation.
//!
//! One pass reads the symbol set from the store, publishes skeleton rows,
//! fetches price history for every symbol missing from the session cache,
//! waits for all of those fetches to settle, and publishes the final rows.
//!
//! ```text
//! WatchlistStore ──symbols──▶ refresh() ──PlaceholderReady──▶ subscribers
//!                                  │
//!                     join_all(fetch per uncached symbol)
//!                                  │  (writes under RwLock)
//!                                  ▼
//!                            session cache ──PassCompleted──▶ subscribers
//! ```
//!
//! Passes are not serialized against each other. A pass that starts while an
//! earlier one is still fetching may see that pass's results land in the
//! cache; both passes then emit their own `PassCompleted`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};
use stockwatch_market_data::{PriceSample, QuoteProvider};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use super::events::{AggregationEvent, EventBus};
use super::model::{WatchlistConfig, WatchlistEntry, WatchlistSnapshot};
use super::store::WatchlistStore;
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::errors::Result;

/// Builds watchlist snapshots from the store and a quote provider.
pub struct WatchlistAggregator {
    provider: Arc<dyn QuoteProvider>,
    store: Arc<dyn WatchlistStore>,
    config: WatchlistConfig,
    /// Session cache of fetched series, keyed by symbol.
    cache: RwLock<HashMap<String, Vec<PriceSample>>>,
    events: EventBus<AggregationEvent>,
    passes: AtomicU64,
}

impl WatchlistAggregator {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        store: Arc<dyn WatchlistStore>,
        config: WatchlistConfig,
    ) -> Self {
        Self {
            provider,
            store,
            config,
            cache: RwLock::new(HashMap::new()),
            events: EventBus::new(EVENT_CHANNEL_CAPACITY),
            passes: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &WatchlistConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn WatchlistStore> {
        &self.store
    }

    /// Subscribe to placeholder and completion events of every pass.
    pub fn subscribe(&self) -> broadcast::Receiver<AggregationEvent> {
        self.events.subscribe()
    }

    /// Run one aggregation pass and return its final snapshot.
    ///
    /// Only a failure to read the store is returned as an error. A failed
    /// price fetch leaves that symbol as a placeholder row and is not cached,
    /// so the next pass fetches it again.
    pub async fn refresh(&self) -> Result<WatchlistSnapshot> {
        let pass = self.passes.fetch_add(1, Ordering::SeqCst) + 1;

        let symbols = self.store.list_symbols()?;
        let mut names = HashMap::with_capacity(symbols.len());
        for symbol in &symbols {
            names.insert(symbol.clone(), self.store.display_name(symbol)?);
        }

        let (placeholder, missing) = {
            let cache = self.cache.read().await;
            let placeholder = self.build_snapshot(pass, &symbols, &names, &cache);
            let missing: Vec<String> = symbols
                .iter()
                .filter(|symbol| !cache.contains_key(symbol.as_str()))
                .cloned()
                .collect();
            (placeholder, missing)
        };
        self.events
            .publish(AggregationEvent::PlaceholderReady(placeholder));

        debug!(
            "Watchlist pass {}: {} symbols, {} to fetch",
            pass,
            symbols.len(),
            missing.len()
        );

        let outcomes = join_all(missing.iter().map(|symbol| self.fetch_into_cache(symbol))).await;
        let failed = outcomes.iter().filter(|ok| !**ok).count();

        let snapshot = {
            let cache = self.cache.read().await;
            self.build_snapshot(pass, &symbols, &names, &cache)
        };

        info!(
            "Watchlist pass {} completed: {} entries, {} fetched, {} failed",
            pass,
            snapshot.len(),
            missing.len() - failed,
            failed
        );
        self.events
            .publish(AggregationEvent::PassCompleted(snapshot.clone()));

        Ok(snapshot)
    }

    /// Cached series for `symbol`, if a previous pass fetched it.
    pub async fn cached_series(&self, symbol: &str) -> Option<Vec<PriceSample>> {
        self.cache.read().await.get(symbol).cloned()
    }

    /// Drop every cached series so the next pass refetches all symbols.
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        info!("Clearing {} cached series", cache.len());
        cache.clear();
    }

    /// Re-run a pass whenever the store reports a change.
    ///
    /// The listener lives until the returned subscription is dropped.
    pub fn watch_store(self: &Arc<Self>) -> WatchlistSubscription {
        let mut receiver = self.store.subscribe();
        let aggregator = Arc::clone(self);

        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        debug!("Watchlist changed ({}), refreshing", event.name());
                        aggregator.refresh_logged().await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Missed {} watchlist events, refreshing", skipped);
                        aggregator.refresh_logged().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        WatchlistSubscription { handle }
    }

    async fn refresh_logged(&self) {
        if let Err(e) = self.refresh().await {
            warn!("Watchlist refresh failed: {}", e);
        }
    }

    /// Fetch one symbol's history into the cache. Returns whether it succeeded.
    async fn fetch_into_cache(&self, symbol: &str) -> bool {
        match self
            .provider
            .fetch_price_history(symbol, self.config.history_days)
            .await
        {
            Ok(series) => {
                self.cache.write().await.insert(symbol.to_string(), series);
                true
            }
            Err(e) => {
                warn!(
                    "Failed to fetch price history for {} [{}]: {}",
                    symbol,
                    e.kind(),
                    e
                );
                false
            }
        }
    }

    fn build_snapshot(
        &self,
        pass: u64,
        symbols: &[String],
        names: &HashMap<String, Option<String>>,
        cache: &HashMap<String, Vec<PriceSample>>,
    ) -> WatchlistSnapshot {
        let entries = symbols
            .iter()
            .map(|symbol| {
                WatchlistEntry::new(
                    symbol.as_str(),
                    names.get(symbol).cloned().flatten(),
                    cache.get(symbol).cloned().unwrap_or_default(),
                    &self.config,
                )
            })
            .collect();
        WatchlistSnapshot::new(pass, entries)
    }
}

/// Handle to a [`WatchlistAggregator::watch_store`] listener. Dropping it stops the listener.
#[derive(Debug)]
pub struct WatchlistSubscription {
    handle: JoinHandle<()>,
}

impl WatchlistSubscription {
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for WatchlistSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
