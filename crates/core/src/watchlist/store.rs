//! Watchlist persistence.
//!
//! A store keeps the ordered, duplicate-free list of watched symbols together
//! with a symbol → display-name map, and publishes a [`WatchlistEvent`] after
//! every change so aggregators can re-run.
//!
//! Two implementations are provided:
//! - [`InMemoryWatchlistStore`] - process-local, used by tests and ephemeral sessions
//! - [`JsonFileWatchlistStore`] - a single JSON document on disk

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::events::{EventBus, WatchlistEvent};
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::errors::{Result, StoreError};

/// Storage interface for the watchlist.
///
/// Operations are synchronous: a watchlist is a handful of symbols and every
/// implementation keeps it in memory.
pub trait WatchlistStore: Send + Sync {
    /// Symbols in insertion order.
    fn list_symbols(&self) -> Result<Vec<String>>;

    fn contains(&self, symbol: &str) -> Result<bool>;

    fn display_name(&self, symbol: &str) -> Result<Option<String>>;

    /// Add a symbol. Returns `false` (and publishes nothing) when it is already present.
    ///
    /// A blank display name is not stored.
    fn add(&self, symbol: &str, display_name: &str) -> Result<bool>;

    /// Remove a symbol and its display name. Returns `false` when it was absent.
    fn remove(&self, symbol: &str) -> Result<bool>;

    /// First-run hook: write `defaults` unless the store was already onboarded.
    ///
    /// Returns `true` when the defaults were written.
    fn seed_defaults(&self, defaults: &[(&str, &str)]) -> Result<bool>;

    /// Subscribe to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<WatchlistEvent>;
}

/// Normalize a symbol into its stored form (trimmed, upper case).
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(StoreError::InvalidSymbol(symbol.to_string()).into());
    }
    Ok(trimmed.to_uppercase())
}

/// The persisted state shared by both stores.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WatchlistDocument {
    #[serde(default)]
    onboarded: bool,
    #[serde(default)]
    symbols: Vec<String>,
    #[serde(default)]
    names: BTreeMap<String, String>,
}

impl WatchlistDocument {
    fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    fn add(&mut self, symbol: &str, display_name: &str) -> bool {
        if self.contains(symbol) {
            return false;
        }
        self.symbols.push(symbol.to_string());
        let display_name = display_name.trim();
        if !display_name.is_empty() {
            self.names
                .insert(symbol.to_string(), display_name.to_string());
        }
        true
    }

    fn remove(&mut self, symbol: &str) -> bool {
        let before = self.symbols.len();
        self.symbols.retain(|s| s != symbol);
        self.names.remove(symbol);
        self.symbols.len() != before
    }

    /// Returns the symbols actually written, or `None` when already onboarded.
    fn seed(&mut self, defaults: &[(&str, &str)]) -> Result<Option<Vec<String>>> {
        if self.onboarded {
            return Ok(None);
        }
        let mut seeded = Vec::with_capacity(defaults.len());
        for (symbol, name) in defaults {
            let symbol = normalize_symbol(symbol)?;
            if self.add(&symbol, name) {
                seeded.push(symbol);
            }
        }
        self.onboarded = true;
        Ok(Some(seeded))
    }
}

/// Apply `change` to the document, persist through `save`, and only then
/// commit it in memory.
fn mutate<T>(
    document: &mut WatchlistDocument,
    change: impl FnOnce(&mut WatchlistDocument) -> Result<T>,
    save: impl FnOnce(&WatchlistDocument) -> Result<()>,
) -> Result<T> {
    let mut next = document.clone();
    let outcome = change(&mut next)?;
    if next != *document {
        save(&next)?;
        *document = next;
    }
    Ok(outcome)
}

fn lock(document: &Mutex<WatchlistDocument>) -> Result<MutexGuard<'_, WatchlistDocument>> {
    document
        .lock()
        .map_err(|e| StoreError::Poisoned(e.to_string()).into())
}

// =============================================================================
// In-memory store
// =============================================================================

/// Watchlist kept only for the lifetime of the process.
pub struct InMemoryWatchlistStore {
    document: Mutex<WatchlistDocument>,
    events: EventBus<WatchlistEvent>,
}

impl InMemoryWatchlistStore {
    pub fn new() -> Self {
        Self {
            document: Mutex::new(WatchlistDocument::default()),
            events: EventBus::new(EVENT_CHANNEL_CAPACITY),
        }
    }

    /// A store already onboarded with the given symbols.
    pub fn with_symbols(symbols: &[(&str, &str)]) -> Result<Self> {
        let store = Self::new();
        {
            let mut document = lock(&store.document)?;
            document.seed(symbols)?;
        }
        Ok(store)
    }
}

impl Default for InMemoryWatchlistStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchlistStore for InMemoryWatchlistStore {
    fn list_symbols(&self) -> Result<Vec<String>> {
        Ok(lock(&self.document)?.symbols.clone())
    }

    fn contains(&self, symbol: &str) -> Result<bool> {
        let symbol = normalize_symbol(symbol)?;
        Ok(lock(&self.document)?.contains(&symbol))
    }

    fn display_name(&self, symbol: &str) -> Result<Option<String>> {
        let symbol = normalize_symbol(symbol)?;
        Ok(lock(&self.document)?.names.get(&symbol).cloned())
    }

    fn add(&self, symbol: &str, display_name: &str) -> Result<bool> {
        let symbol = normalize_symbol(symbol)?;
        let added = lock(&self.document)?.add(&symbol, display_name);
        if added {
            self.events.publish(WatchlistEvent::Added { symbol });
        }
        Ok(added)
    }

    fn remove(&self, symbol: &str) -> Result<bool> {
        let symbol = normalize_symbol(symbol)?;
        let removed = lock(&self.document)?.remove(&symbol);
        if removed {
            self.events.publish(WatchlistEvent::Removed { symbol });
        }
        Ok(removed)
    }

    fn seed_defaults(&self, defaults: &[(&str, &str)]) -> Result<bool> {
        let seeded = lock(&self.document)?.seed(defaults)?;
        match seeded {
            Some(symbols) => {
                self.events.publish(WatchlistEvent::Seeded { symbols });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<WatchlistEvent> {
        self.events.subscribe()
    }
}

// =============================================================================
// JSON file store
// =============================================================================

/// Watchlist persisted as one pretty-printed JSON document.
///
/// The file is read once on open and rewritten after every change. A missing
/// file is treated as a fresh, not yet onboarded watchlist.
pub struct JsonFileWatchlistStore {
    path: PathBuf,
    document: Mutex<WatchlistDocument>,
    events: EventBus<WatchlistEvent>,
}

impl JsonFileWatchlistStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = if path.exists() {
            let raw = fs::read(&path).map_err(StoreError::from)?;
            serde_json::from_slice(&raw).map_err(StoreError::from)?
        } else {
            debug!("No watchlist at {}, starting empty", path.display());
            WatchlistDocument::default()
        };

        Ok(Self {
            path,
            document: Mutex::new(document),
            events: EventBus::new(EVENT_CHANNEL_CAPACITY),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(path: &Path, document: &WatchlistDocument) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(StoreError::from)?;
        }
        let json = serde_json::to_vec_pretty(document).map_err(StoreError::from)?;

        // Write next to the target and rename so a crash never leaves half a file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(StoreError::from)?;
        fs::rename(&tmp, path).map_err(StoreError::from)?;
        Ok(())
    }
}

impl WatchlistStore for JsonFileWatchlistStore {
    fn list_symbols(&self) -> Result<Vec<String>> {
        Ok(lock(&self.document)?.symbols.clone())
    }

    fn contains(&self, symbol: &str) -> Result<bool> {
        let symbol = normalize_symbol(symbol)?;
        Ok(lock(&self.document)?.contains(&symbol))
    }

    fn display_name(&self, symbol: &str) -> Result<Option<String>> {
        let symbol = normalize_symbol(symbol)?;
        Ok(lock(&self.document)?.names.get(&symbol).cloned())
    }

    fn add(&self, symbol: &str, display_name: &str) -> Result<bool> {
        let symbol = normalize_symbol(symbol)?;
        let added = {
            let mut document = lock(&self.document)?;
            mutate(
                &mut document,
                |doc| Ok(doc.add(&symbol, display_name)),
                |doc| Self::save(&self.path, doc),
            )?
        };
        if added {
            info!("Added {} to watchlist", symbol);
            self.events.publish(WatchlistEvent::Added { symbol });
        }
        Ok(added)
    }

    fn remove(&self, symbol: &str) -> Result<bool> {
        let symbol = normalize_symbol(symbol)?;
        let removed = {
            let mut document = lock(&self.document)?;
            mutate(
                &mut document,
                |doc| Ok(doc.remove(&symbol)),
                |doc| Self::save(&self.path, doc),
            )?
        };
        if removed {
            info!("Removed {} from watchlist", symbol);
            self.events.publish(WatchlistEvent::Removed { symbol });
        }
        Ok(removed)
    }

    fn seed_defaults(&self, defaults: &[(&str, &str)]) -> Result<bool> {
        let seeded = {
            let mut document = lock(&self.document)?;
            mutate(
                &mut document,
                |doc| doc.seed(defaults),
                |doc| Self::save(&self.path, doc),
            )?
        };
        match seeded {
            Some(symbols) => {
                info!("Seeded watchlist with {} default symbols", symbols.len());
                self.events.publish(WatchlistEvent::Seeded { symbols });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<WatchlistEvent> {
        self.events.subscribe()
    }
}
