//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteProvider` trait that all providers implement
//! - Concrete provider implementations (Finnhub)
//!
//! Consumers hold providers as `Arc<dyn QuoteProvider>` and receive them by
//! injection, so tests can substitute in-memory doubles.

mod traits;

pub mod finnhub;

// Re-exports
pub use traits::QuoteProvider;
