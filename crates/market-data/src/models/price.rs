use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV data point for a symbol.
///
/// Series of samples are ordered newest-first throughout the workspace.
/// Providers are responsible for returning them in that order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Start of the candle
    pub timestamp: DateTime<Utc>,

    /// Opening price
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Traded volume
    pub volume: f64,
}

impl PriceSample {
    /// Create a full OHLCV sample
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Create a sample where only the close is known
    pub fn close_only(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self::new(timestamp, close, close, close, close, 0.0)
    }

    /// Calendar date of the sample in UTC.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Calendar date of the sample in the given time zone.
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.timestamp.with_timezone(tz).date_naive()
    }
}

/// Sort samples newest-first in place.
pub fn sort_newest_first(samples: &mut [PriceSample]) {
    samples.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
