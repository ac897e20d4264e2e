//! News article models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which news stream to fetch.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewsScope {
    /// General market headlines
    AllMarkets,
    /// Headlines about a single company
    ForSymbol(String),
}

impl NewsScope {
    /// Heading shown above the article list.
    pub fn title(&self) -> String {
        match self {
            Self::AllMarkets => "Top Stories".to_string(),
            Self::ForSymbol(symbol) => symbol.to_uppercase(),
        }
    }
}

/// A single news article.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Provider article id
    pub id: i64,

    /// Category (e.g. "general", "company")
    pub category: String,

    /// Publication time
    pub published_at: DateTime<Utc>,

    /// Headline
    pub headline: String,

    /// Image URL, empty when the provider has none
    pub image: String,

    /// Related symbols as reported by the provider
    pub related: String,

    /// Publisher name
    pub source: String,

    /// Short summary
    pub summary: String,

    /// Article URL
    pub url: String,
}
