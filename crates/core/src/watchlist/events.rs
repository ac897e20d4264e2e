//! Watchlist change notifications and aggregation progress events.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::model::WatchlistSnapshot;

/// Emitted by a [`WatchlistStore`](super::WatchlistStore) after its symbol set changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WatchlistEvent {
    /// The first-run default set was written.
    Seeded { symbols: Vec<String> },
    Added { symbol: String },
    Removed { symbol: String },
}

impl WatchlistEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Seeded { .. } => "watchlist:seeded",
            Self::Added { .. } => "watchlist:added",
            Self::Removed { .. } => "watchlist:removed",
        }
    }
}

/// Progress of one aggregation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AggregationEvent {
    /// Skeleton rows, published before any fetch starts.
    PlaceholderReady(WatchlistSnapshot),
    /// Final rows, published once every fetch of the pass has settled.
    PassCompleted(WatchlistSnapshot),
}

impl AggregationEvent {
    pub fn snapshot(&self) -> &WatchlistSnapshot {
        match self {
            Self::PlaceholderReady(snapshot) | Self::PassCompleted(snapshot) => snapshot,
        }
    }

    pub fn pass(&self) -> u64 {
        self.snapshot().pass
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::PassCompleted(_))
    }
}

/// Lightweight broadcast bus that fans events out to every subscriber.
#[derive(Clone, Debug)]
pub struct EventBus<E: Clone> {
    sender: broadcast::Sender<E>,
}

impl<E: Clone> EventBus<E> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: E) {
        // Sending only fails when nobody is listening.
        let _ = self.sender.send(event);
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
