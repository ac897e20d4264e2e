//! Tests for WatchlistAggregator.
//!
//! # Contract Points
//!
//! 1. Join barrier: every fetch settles before `PassCompleted`, which fires once per pass
//! 2. Partial failure: failed symbols stay as placeholder rows, the rest are enriched
//! 3. Ordering: rows are sorted by symbol regardless of store or completion order
//! 4. Session cache: a symbol is fetched once per session unless the cache is cleared
//! 5. Change notifications: store events trigger a new pass while subscribed

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::broadcast;

    use crate::series::ChangeClass;
    use crate::test_support::{two_day_series, MockQuoteProvider, ProviderCall};
    use crate::watchlist::{
        AggregationEvent, InMemoryWatchlistStore, WatchlistAggregator, WatchlistConfig,
        WatchlistStore,
    };

    fn store_with(symbols: &[(&str, &str)]) -> Arc<InMemoryWatchlistStore> {
        Arc::new(InMemoryWatchlistStore::with_symbols(symbols).unwrap())
    }

    fn build_aggregator(
        provider: &MockQuoteProvider,
        store: &Arc<InMemoryWatchlistStore>,
    ) -> WatchlistAggregator {
        WatchlistAggregator::new(
            Arc::new(provider.clone()),
            store.clone(),
            WatchlistConfig::default(),
        )
    }

    fn drain(rx: &mut broadcast::Receiver<AggregationEvent>) -> Vec<AggregationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_partial_failure_yields_every_entry_sorted() {
        let provider = MockQuoteProvider::new()
            .with_series("SNAP", two_day_series(10.0, 12.0))
            .with_series("AAPL", two_day_series(100.0, 95.0))
            .fail_symbol("MSFT")
            .fail_symbol("NVDA");
        let store = store_with(&[
            ("SNAP", "Snap Inc."),
            ("NVDA", "Nvidia Inc."),
            ("AAPL", "Apple Inc."),
            ("MSFT", "Microsoft Corporation"),
        ]);
        let aggregator = build_aggregator(&provider, &store);
        let mut rx = aggregator.subscribe();

        let snapshot = aggregator.refresh().await.unwrap();

        assert_eq!(snapshot.symbols(), vec!["AAPL", "MSFT", "NVDA", "SNAP"]);

        let aapl = snapshot.get("AAPL").unwrap();
        assert!(!aapl.is_placeholder());
        assert_eq!(aapl.change_class, ChangeClass::Down);
        assert_eq!(aapl.display_name, "Apple Inc.");

        let snap = snapshot.get("SNAP").unwrap();
        assert_eq!(snap.change_class, ChangeClass::Up);
        assert_eq!(snap.latest_price, 12.0);

        for symbol in ["MSFT", "NVDA"] {
            let entry = snapshot.get(symbol).unwrap();
            assert!(entry.is_placeholder());
            assert_eq!(entry.latest_price, 0.0);
            assert_eq!(entry.change_class, ChangeClass::Neutral);
        }

        let completed: Vec<_> = drain(&mut rx)
            .into_iter()
            .filter(AggregationEvent::is_completed)
            .collect();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].snapshot(), &snapshot);
    }

    #[tokio::test]
    async fn test_placeholder_published_before_completion() {
        let provider = MockQuoteProvider::new().with_series("AAPL", two_day_series(1.0, 2.0));
        let store = store_with(&[("AAPL", "Apple Inc."), ("GOOG", "Alphabet")]);
        let aggregator = build_aggregator(&provider, &store);
        let mut rx = aggregator.subscribe();

        aggregator.refresh().await.unwrap();

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        match &events[0] {
            AggregationEvent::PlaceholderReady(snapshot) => {
                assert_eq!(snapshot.symbols(), vec!["AAPL", "GOOG"]);
                assert!(snapshot.entries.iter().all(|e| e.is_placeholder()));
            }
            other => panic!("expected placeholder first, got {:?}", other),
        }
        assert!(events[1].is_completed());
        assert_eq!(events[0].pass(), events[1].pass());
    }

    #[tokio::test]
    async fn test_empty_watchlist_completes_immediately() {
        let provider = MockQuoteProvider::new();
        let store = Arc::new(InMemoryWatchlistStore::new());
        let aggregator = build_aggregator(&provider, &store);
        let mut rx = aggregator.subscribe();

        let snapshot = aggregator.refresh().await.unwrap();

        assert!(snapshot.is_empty());
        assert!(provider.calls().is_empty());
        let events = drain(&mut rx);
        assert_eq!(events.iter().filter(|e| e.is_completed()).count(), 1);
    }

    #[tokio::test]
    async fn test_cached_symbols_are_not_refetched() {
        let provider = MockQuoteProvider::new()
            .with_series("AAPL", two_day_series(1.0, 2.0))
            .with_series("MSFT", two_day_series(3.0, 4.0));
        let store = store_with(&[("AAPL", "Apple Inc.")]);
        let aggregator = build_aggregator(&provider, &store);

        aggregator.refresh().await.unwrap();
        store.add("MSFT", "Microsoft Corporation").unwrap();
        let second = aggregator.refresh().await.unwrap();

        assert_eq!(provider.price_history_calls(), vec!["AAPL", "MSFT"]);
        assert!(second.entries.iter().all(|e| !e.is_placeholder()));
        assert!(second.pass > 1);
    }

    #[tokio::test]
    async fn test_failed_symbol_is_retried_next_pass() {
        let provider = MockQuoteProvider::new().fail_symbol("AAPL");
        let store = store_with(&[("AAPL", "Apple Inc.")]);
        let aggregator = build_aggregator(&provider, &store);

        aggregator.refresh().await.unwrap();
        aggregator.refresh().await.unwrap();

        assert_eq!(provider.count("price_history"), 2);
        assert!(aggregator.cached_series("AAPL").await.is_none());
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let provider = MockQuoteProvider::new().with_series("AAPL", two_day_series(1.0, 2.0));
        let store = store_with(&[("AAPL", "Apple Inc.")]);
        let aggregator = build_aggregator(&provider, &store);

        aggregator.refresh().await.unwrap();
        assert!(aggregator.cached_series("AAPL").await.is_some());

        aggregator.clear_cache().await;
        aggregator.refresh().await.unwrap();

        assert_eq!(provider.count("price_history"), 2);
    }

    #[tokio::test]
    async fn test_fetches_use_configured_window() {
        let provider = MockQuoteProvider::new().with_series("AAPL", two_day_series(1.0, 2.0));
        let store = store_with(&[("AAPL", "Apple Inc.")]);
        let aggregator = build_aggregator(&provider, &store);

        aggregator.refresh().await.unwrap();

        assert_eq!(
            provider.calls(),
            vec![ProviderCall::PriceHistory {
                symbol: "AAPL".to_string(),
                days_back: 7
            }]
        );
    }

    #[tokio::test]
    async fn test_missing_display_name_renders_unknown() {
        let provider = MockQuoteProvider::new().with_series("PINS", two_day_series(1.0, 2.0));
        let store = Arc::new(InMemoryWatchlistStore::new());
        store.add("PINS", "").unwrap();
        let aggregator = build_aggregator(&provider, &store);

        let snapshot = aggregator.refresh().await.unwrap();
        assert_eq!(snapshot.get("PINS").unwrap().display_name, "Unknown");

        store.remove("PINS").unwrap();
        let snapshot = aggregator.refresh().await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_holds_back_completion() {
        let provider = MockQuoteProvider::new()
            .with_series("AAPL", two_day_series(1.0, 2.0))
            .delay_operation("price_history", Duration::from_secs(5));
        let store = store_with(&[("AAPL", "Apple Inc.")]);
        let aggregator = Arc::new(build_aggregator(&provider, &store));
        let mut rx = aggregator.subscribe();

        let task = {
            let aggregator = aggregator.clone();
            tokio::spawn(async move { aggregator.refresh().await })
        };

        let first = rx.recv().await.unwrap();
        assert!(!first.is_completed());
        assert!(!task.is_finished());

        let second = rx.recv().await.unwrap();
        assert!(second.is_completed());
        let snapshot = task.await.unwrap().unwrap();
        assert!(!snapshot.get("AAPL").unwrap().is_placeholder());
    }

    #[tokio::test(start_paused = true)]
    async fn test_symbols_fetch_concurrently() {
        let provider = MockQuoteProvider::new()
            .with_series("AAPL", two_day_series(1.0, 2.0))
            .with_series("MSFT", two_day_series(3.0, 4.0))
            .with_series("NKE", two_day_series(5.0, 6.0))
            .delay_operation("price_history", Duration::from_secs(5));
        let store = store_with(&[
            ("AAPL", "Apple Inc."),
            ("MSFT", "Microsoft Corporation"),
            ("NKE", "Nike"),
        ]);
        let aggregator = build_aggregator(&provider, &store);

        let started = tokio::time::Instant::now();
        let snapshot = aggregator.refresh().await.unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_secs(5));
        assert!(elapsed < Duration::from_secs(10));
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.entries.iter().all(|entry| !entry.is_placeholder()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_changes_trigger_new_pass() {
        let provider = MockQuoteProvider::new()
            .with_series("AAPL", two_day_series(1.0, 2.0))
            .with_series("NKE", two_day_series(3.0, 4.0));
        let store = store_with(&[("AAPL", "Apple Inc.")]);
        let aggregator = Arc::new(build_aggregator(&provider, &store));
        let mut rx = aggregator.subscribe();

        let subscription = aggregator.watch_store();
        assert!(subscription.is_active());

        store.add("NKE", "Nike").unwrap();

        let completed = loop {
            let event = rx.recv().await.unwrap();
            if event.is_completed() {
                break event;
            }
        };
        assert_eq!(completed.snapshot().symbols(), vec!["AAPL", "NKE"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_subscription_stops_listening() {
        let provider = MockQuoteProvider::new().with_series("AAPL", two_day_series(1.0, 2.0));
        let store = store_with(&[]);
        let aggregator = Arc::new(build_aggregator(&provider, &store));
        let mut rx = aggregator.subscribe();

        let subscription = aggregator.watch_store();
        drop(subscription);
        tokio::task::yield_now().await;

        store.add("AAPL", "Apple Inc.").unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(drain(&mut rx).is_empty());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_add_does_not_duplicate_rows() {
        let provider = MockQuoteProvider::new().with_series("AAPL", two_day_series(1.0, 2.0));
        let store = store_with(&[("AAPL", "Apple Inc.")]);
        let aggregator = build_aggregator(&provider, &store);

        assert!(!store.add("AAPL", "Apple Inc.").unwrap());
        let snapshot = aggregator.refresh().await.unwrap();

        assert_eq!(snapshot.len(), 1);
    }
}
