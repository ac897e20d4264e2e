//! Pure derivations over a newest-first price series.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use stockwatch_market_data::PriceSample;

/// Colour class of a change value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeClass {
    /// Zero or positive change
    Up,
    /// Negative change
    Down,
    /// No change available (placeholder or non-finite)
    Neutral,
}

impl ChangeClass {
    /// Classify a finite change. Zero counts as `Up`.
    pub fn classify(change: f64) -> Self {
        if change < 0.0 {
            Self::Down
        } else {
            Self::Up
        }
    }

    /// Classify an optional change, `None` being `Neutral`.
    pub fn from_change(change: Option<f64>) -> Self {
        change.map_or(Self::Neutral, Self::classify)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Neutral => "neutral",
        }
    }
}

/// Fractional change between the latest close and the close of the most
/// recent earlier calendar day, with days taken in UTC.
///
/// See [`percentage_change_in`].
pub fn percentage_change(series: &[PriceSample]) -> f64 {
    percentage_change_in(series, &Utc)
}

/// Fractional change between the latest close and the close of the most
/// recent earlier calendar day, with days taken in `tz`.
///
/// The series must be newest-first. The result is `1 - prior / latest`, where
/// `prior` is the close of the first sample whose date differs from the first
/// sample's date. Returns `0.0` when no such sample exists.
///
/// A zero latest close yields a non-finite result; use [`derive_change`] to
/// turn that into "no change available".
pub fn percentage_change_in<Tz: TimeZone>(series: &[PriceSample], tz: &Tz) -> f64 {
    let Some(latest) = series.first() else {
        return 0.0;
    };
    let latest_date = latest.date_in(tz);

    match series.iter().find(|sample| sample.date_in(tz) != latest_date) {
        Some(prior) => 1.0 - (prior.close / latest.close),
        None => 0.0,
    }
}

/// Map a raw change to `None` when it is not a finite number.
pub fn derive_change(raw: f64) -> Option<f64> {
    raw.is_finite().then_some(raw)
}

/// Close of the newest sample.
pub fn latest_close(series: &[PriceSample]) -> Option<f64> {
    series.first().map(|sample| sample.close)
}

/// Close prices in chronological (oldest-first) order for charting.
pub fn chart_points(series: &[PriceSample]) -> Vec<f64> {
    series.iter().rev().map(|sample| sample.close).collect()
}

/// Everything derived from a single series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub latest_close: Option<f64>,
    pub change: Option<f64>,
    pub change_class: ChangeClass,
}

impl SeriesSummary {
    /// Summary of a series that has not been loaded.
    pub fn placeholder() -> Self {
        Self {
            latest_close: None,
            change: None,
            change_class: ChangeClass::Neutral,
        }
    }
}

/// Derive latest close, change and change class from a newest-first series.
///
/// An empty series summarizes to [`SeriesSummary::placeholder`].
pub fn summarize_in<Tz: TimeZone>(series: &[PriceSample], tz: &Tz) -> SeriesSummary {
    if series.is_empty() {
        return SeriesSummary::placeholder();
    }

    let change = derive_change(percentage_change_in(series, tz));
    SeriesSummary {
        latest_close: latest_close(series),
        change,
        change_class: ChangeClass::from_change(change),
    }
}
