//! Detail aggregation for a single symbol.
//!
//! Price history and metrics are fetched concurrently and joined into one
//! snapshot. News is fetched on its own and lands in the snapshot whenever it
//! arrives, without waiting for (or holding back) the join. An open session
//! also follows the watchlist, so its watch state tracks later adds and removes.

use std::sync::Arc;

use log::{debug, info, warn};
use stockwatch_market_data::{NewsScope, PriceSample, QuoteProvider, SymbolMetrics};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use super::model::{DetailConfig, DetailRequest, DetailSnapshot};
use crate::errors::Result;
use crate::watchlist::{normalize_symbol, WatchlistStore};

pub struct DetailAggregator {
    provider: Arc<dyn QuoteProvider>,
    store: Arc<dyn WatchlistStore>,
    config: DetailConfig,
}

impl DetailAggregator {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        store: Arc<dyn WatchlistStore>,
        config: DetailConfig,
    ) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    pub fn config(&self) -> &DetailConfig {
        &self.config
    }

    /// Fetch price history (unless supplied) and metrics, and join them.
    ///
    /// The returned snapshot has `loaded` set and no news. A failed fetch
    /// leaves its field empty.
    pub async fn load(&self, request: DetailRequest) -> Result<DetailSnapshot> {
        let symbol = normalize_symbol(&request.symbol)?;
        let is_watched = self.store.contains(&symbol)?;

        let (series, metrics) = join_price_and_metrics(
            self.provider.as_ref(),
            &self.config,
            &symbol,
            request.series,
        )
        .await;

        let mut snapshot =
            DetailSnapshot::new(&symbol, request.company_name, series, metrics, &self.config);
        snapshot.is_watched = is_watched;
        snapshot.loaded = true;
        Ok(snapshot)
    }

    /// Start loading a detail view and return a session that tracks it.
    ///
    /// The session's first snapshot carries whatever the request supplied. The
    /// joined load and the news fetch then update it independently, and
    /// `is_watched` follows watchlist changes for as long as the session lives.
    /// Must be called from within a Tokio runtime.
    pub fn open(&self, request: DetailRequest) -> Result<DetailSession> {
        let symbol = normalize_symbol(&request.symbol)?;
        // Subscribe before reading the watch state so no change falls in between.
        let mut store_events = self.store.subscribe();

        let mut initial = DetailSnapshot::new(
            &symbol,
            request.company_name,
            request.series.clone().unwrap_or_default(),
            None,
            &self.config,
        );
        initial.is_watched = self.store.contains(&symbol)?;
        let (sender, receiver) = watch::channel(initial);
        let sender = Arc::new(sender);

        let join_task = {
            let provider = Arc::clone(&self.provider);
            let config = self.config.clone();
            let sender = Arc::clone(&sender);
            let symbol = symbol.clone();
            let supplied = request.series;
            tokio::spawn(async move {
                let (series, metrics) =
                    join_price_and_metrics(provider.as_ref(), &config, &symbol, supplied).await;
                sender.send_modify(|snapshot| {
                    snapshot.set_series(series, &config);
                    snapshot.set_metrics(metrics, &config);
                    snapshot.loaded = true;
                });
            })
        };

        let watch_state_task = {
            let store = Arc::clone(&self.store);
            let sender = Arc::clone(&sender);
            let symbol = symbol.clone();
            tokio::spawn(async move {
                loop {
                    match store_events.recv().await {
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            debug!(
                                "Detail view for {} skipped {} watchlist events",
                                symbol, skipped
                            );
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                    let watched = match store.contains(&symbol) {
                        Ok(watched) => watched,
                        Err(e) => {
                            warn!("Failed to read watch state for {}: {}", symbol, e);
                            continue;
                        }
                    };
                    sender.send_if_modified(|snapshot| {
                        let changed = snapshot.is_watched != watched;
                        snapshot.is_watched = watched;
                        changed
                    });
                }
            })
        };

        let news_task = {
            let provider = Arc::clone(&self.provider);
            let sender = Arc::clone(&sender);
            tokio::spawn(async move {
                let scope = NewsScope::ForSymbol(symbol.clone());
                let news = match provider.fetch_news(&scope).await {
                    Ok(items) => items,
                    Err(e) => {
                        warn!("Failed to fetch news for {} [{}]: {}", symbol, e.kind(), e);
                        Vec::new()
                    }
                };
                sender.send_modify(|snapshot| {
                    snapshot.news = news;
                    snapshot.news_loaded = true;
                });
            })
        };

        Ok(DetailSession {
            receiver,
            tasks: vec![join_task, news_task, watch_state_task],
        })
    }

    /// Add the symbol to the watchlist. Returns `false` if it was already there.
    ///
    /// The store's change notification triggers re-aggregation in any
    /// watchlist aggregator listening to it and marks open sessions for the
    /// symbol as watched.
    pub fn add_to_watchlist(&self, symbol: &str, company_name: &str) -> Result<bool> {
        let added = self.store.add(symbol, company_name)?;
        if added {
            info!("Added {} to watchlist from detail view", symbol);
        } else {
            debug!("{} already on watchlist", symbol);
        }
        Ok(added)
    }
}

/// Join the price and metrics fetches. A supplied series replaces the price fetch.
async fn join_price_and_metrics(
    provider: &dyn QuoteProvider,
    config: &DetailConfig,
    symbol: &str,
    supplied: Option<Vec<PriceSample>>,
) -> (Vec<PriceSample>, Option<SymbolMetrics>) {
    let prices = async {
        match supplied {
            Some(series) => series,
            None => match provider
                .fetch_price_history(symbol, config.history_days)
                .await
            {
                Ok(series) => series,
                Err(e) => {
                    warn!(
                        "Failed to fetch price history for {} [{}]: {}",
                        symbol,
                        e.kind(),
                        e
                    );
                    Vec::new()
                }
            },
        }
    };

    let metrics = async {
        match provider.fetch_metrics(symbol).await {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                warn!("Failed to fetch metrics for {} [{}]: {}", symbol, e.kind(), e);
                None
            }
        }
    };

    futures::join!(prices, metrics)
}

/// A detail view being loaded. Dropping it cancels outstanding fetches.
pub struct DetailSession {
    receiver: watch::Receiver<DetailSnapshot>,
    tasks: Vec<JoinHandle<()>>,
}

impl DetailSession {
    /// The latest snapshot.
    pub fn snapshot(&self) -> DetailSnapshot {
        self.receiver.borrow().clone()
    }

    /// A receiver that observes every update.
    pub fn subscribe(&self) -> watch::Receiver<DetailSnapshot> {
        self.receiver.clone()
    }

    /// Wait for the next update. Returns `false` once every session task has
    /// stopped and no more updates can arrive.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Wait until both the join and the news fetch have settled.
    pub async fn settled(&mut self) -> DetailSnapshot {
        let settled = self
            .receiver
            .wait_for(|snapshot| snapshot.loaded && snapshot.news_loaded)
            .await
            .map(|snapshot| snapshot.clone());
        // Tasks that ended without settling leave the last snapshot as final.
        settled.unwrap_or_else(|_| self.receiver.borrow().clone())
    }
}

impl Drop for DetailSession {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
