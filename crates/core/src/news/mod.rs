//! News feed.
//!
//! Loads market-wide or per-symbol stories and shapes them for display.
//! A failed fetch yields an empty feed.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use stockwatch_market_data::{NewsItem, NewsScope, QuoteProvider};

pub struct NewsFeed {
    provider: Arc<dyn QuoteProvider>,
    tz: Tz,
}

impl NewsFeed {
    pub fn new(provider: Arc<dyn QuoteProvider>, tz: Tz) -> Self {
        Self { provider, tz }
    }

    /// Stories for `scope`, newest first. Empty when the fetch fails.
    pub async fn load(&self, scope: &NewsScope) -> Vec<NewsItem> {
        match self.provider.fetch_news(scope).await {
            Ok(mut items) => {
                debug!("Loaded {} stories for {}", items.len(), scope.title());
                items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
                items
            }
            Err(e) => {
                warn!("Failed to load news for {} [{}]: {}", scope.title(), e.kind(), e);
                Vec::new()
            }
        }
    }

    /// Like [`load`](Self::load), shaped for display.
    pub async fn load_views(&self, scope: &NewsScope) -> Vec<NewsStoryView> {
        self.load(scope)
            .await
            .iter()
            .map(|item| NewsStoryView::from_item(item, &self.tz))
            .collect()
    }
}

/// One story as presented in a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsStoryView {
    pub source: String,
    pub headline: String,
    /// Medium-style date, e.g. `Jan 8, 2022`.
    pub date: String,
    pub image_url: Option<String>,
    pub url: String,
}

impl NewsStoryView {
    pub fn from_item<Z: TimeZone>(item: &NewsItem, tz: &Z) -> Self
    where
        Z::Offset: std::fmt::Display,
    {
        let image = item.image.trim();
        Self {
            source: item.source.clone(),
            headline: item.headline.clone(),
            date: medium_date(item.published_at, tz),
            image_url: (!image.is_empty()).then(|| image.to_string()),
            url: item.url.clone(),
        }
    }
}

/// Format a timestamp as a medium-style date in `tz`.
pub fn medium_date<Z: TimeZone>(timestamp: DateTime<Utc>, tz: &Z) -> String
where
    Z::Offset: std::fmt::Display,
{
    timestamp.with_timezone(tz).format("%b %-d, %Y").to_string()
}
