//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all provider operations
//! - [`FailureKind`]: The coarse classification consumers act on

mod kind;

pub use kind::FailureKind;

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Each variant is classified into a [`FailureKind`] via the [`kind`](Self::kind)
/// method. Consumers treat every kind the same way (log and degrade), the
/// classification exists for logging and diagnostics.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No data available for the requested date range.
    /// The symbol exists but has no samples in the specified period.
    #[error("No data for date range")]
    NoDataForRange,

    /// The request could not be built (empty symbol, unencodable query).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider does not implement this operation.
    #[error("Operation '{operation}' not supported by {provider}")]
    NotSupported {
        /// The operation that was attempted
        operation: String,
        /// The provider that rejected it
        provider: String,
    },

    /// The provider rate limited the request (HTTP 429, or 403 on quota exhaustion).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a non-success status.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Decode failed: {provider} - {message}")]
    Decode {
        /// The provider whose payload was malformed
        provider: String,
        /// Description of the decode failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockwatch_market_data::errors::{FailureKind, MarketDataError};
    ///
    /// let error = MarketDataError::RateLimited { provider: "FINNHUB".to_string() };
    /// assert_eq!(error.kind(), FailureKind::Network);
    ///
    /// let error = MarketDataError::SymbolNotFound("INVALID".to_string());
    /// assert_eq!(error.kind(), FailureKind::NotFound);
    /// ```
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::SymbolNotFound(_)
            | Self::NoDataForRange
            | Self::InvalidRequest(_)
            | Self::NotSupported { .. } => FailureKind::NotFound,

            Self::Decode { .. } => FailureKind::Decode,

            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::ProviderError { .. }
            | Self::Network(_) => FailureKind::Network,
        }
    }

    pub(crate) fn decode(provider: &str, message: impl Into<String>) -> Self {
        Self::Decode {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_not_found_is_not_found() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(error.kind(), FailureKind::NotFound);
    }

    #[test]
    fn test_no_data_for_range_is_not_found() {
        assert_eq!(MarketDataError::NoDataForRange.kind(), FailureKind::NotFound);
    }

    #[test]
    fn test_invalid_request_is_not_found() {
        let error = MarketDataError::InvalidRequest("empty symbol".to_string());
        assert_eq!(error.kind(), FailureKind::NotFound);
    }

    #[test]
    fn test_decode_is_decode() {
        let error = MarketDataError::decode("FINNHUB", "expected array");
        assert_eq!(error.kind(), FailureKind::Decode);
    }

    #[test]
    fn test_transport_failures_are_network() {
        let errors = [
            MarketDataError::RateLimited {
                provider: "FINNHUB".to_string(),
            },
            MarketDataError::Timeout {
                provider: "FINNHUB".to_string(),
            },
            MarketDataError::ProviderError {
                provider: "FINNHUB".to_string(),
                message: "HTTP 500".to_string(),
            },
        ];
        for error in errors {
            assert_eq!(error.kind(), FailureKind::Network, "{error}");
        }
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: INVALID");

        let error = MarketDataError::RateLimited {
            provider: "FINNHUB".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: FINNHUB");

        let error = MarketDataError::NotSupported {
            operation: "news".to_string(),
            provider: "STATIC".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Operation 'news' not supported by STATIC"
        );
    }
}
