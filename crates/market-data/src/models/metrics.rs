use serde::{Deserialize, Serialize};

/// Financial metrics for a symbol.
///
/// Fields are individually optional because providers omit them for
/// instruments where they are not meaningful (e.g. beta for a fresh listing).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolMetrics {
    /// 52-week high
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_high: Option<f64>,

    /// 52-week low
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_low: Option<f64>,

    /// 52-week price return (daily basis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_return: Option<f64>,

    /// Beta against the market
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,

    /// 10-day average trading volume
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ten_day_average_volume: Option<f64>,
}

impl SymbolMetrics {
    /// True when the provider returned none of the fields.
    pub fn is_empty(&self) -> bool {
        self.week_52_high.is_none()
            && self.week_52_low.is_none()
            && self.week_52_return.is_none()
            && self.beta.is_none()
            && self.ten_day_average_volume.is_none()
    }
}
