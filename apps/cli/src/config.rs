use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, Context};
use chrono_tz::Tz;
use stockwatch_core::constants::DEFAULT_MARKET_TIMEZONE;
use stockwatch_core::NumberLocale;
use stockwatch_market_data::provider::finnhub::DEFAULT_BASE_URL;

pub struct Config {
    pub finnhub_api_key: Option<String>,
    pub finnhub_base_url: String,
    pub data_dir: PathBuf,
    pub log_format: String,
    pub request_timeout: Duration,
    pub market_tz: Tz,
    pub locale: NumberLocale,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let finnhub_api_key = lookup("FINNHUB_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let finnhub_base_url =
            lookup("FINNHUB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let data_dir = lookup("STOCKWATCH_DATA_DIR").unwrap_or_else(|| "./data".into());
        let log_format = lookup("STOCKWATCH_LOG_FORMAT").unwrap_or_else(|| "text".into());
        let timeout_ms: u64 = lookup("STOCKWATCH_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .parse()
            .unwrap_or(30000);
        let tz_name =
            lookup("STOCKWATCH_MARKET_TZ").unwrap_or_else(|| DEFAULT_MARKET_TIMEZONE.into());
        let market_tz: Tz = tz_name
            .parse()
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("Invalid STOCKWATCH_MARKET_TZ '{}'", tz_name))?;
        let locale = lookup("STOCKWATCH_LOCALE")
            .map(|tag| NumberLocale::from_tag(&tag))
            .unwrap_or_default();

        Ok(Self {
            finnhub_api_key,
            finnhub_base_url,
            data_dir: PathBuf::from(data_dir),
            log_format,
            request_timeout: Duration::from_millis(timeout_ms),
            market_tz,
            locale,
        })
    }

    pub fn watchlist_path(&self) -> PathBuf {
        self.data_dir.join("watchlist.json")
    }

    pub fn require_api_key(&self) -> anyhow::Result<&str> {
        self.finnhub_api_key
            .as_deref()
            .ok_or_else(|| anyhow!("FINNHUB_API_KEY is not set"))
    }
}
