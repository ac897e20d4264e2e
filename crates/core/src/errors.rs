//! Core error types for the stockwatch application.
//!
//! Fetch failures for a single symbol or field never reach these types; the
//! aggregators log them and degrade the affected unit instead. What remains
//! are failures of the surrounding infrastructure (store, configuration).

use stockwatch_market_data::MarketDataError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the core crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Watchlist store failed: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid configuration value: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised by watchlist store implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document could not be (de)serialized.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The symbol is empty or otherwise unusable as a key.
    #[error("Invalid symbol: '{0}'")]
    InvalidSymbol(String),

    /// A writer panicked while holding the store lock.
    #[error("Store lock poisoned: {0}")]
    Poisoned(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_converts_into_root_error() {
        let err: Error = StoreError::InvalidSymbol(" ".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Watchlist store failed: Invalid symbol: ' '"
        );
    }

    #[test]
    fn test_market_data_error_converts_into_root_error() {
        let err: Error = MarketDataError::NoDataForRange.into();
        assert!(matches!(err, Error::MarketData(_)));
    }
}
