pub mod cache;
pub mod providers;

pub use cache::CachedSearchProvider;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Largest `display` value the news endpoint accepts.
pub const MAX_RESULT_COUNT: usize = 100;

/// Search provider abstraction - the pipeline only talks to this trait
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a search query with given options
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResults, SearchError>;
}

/// Result ordering requested from the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Provider relevance ranking (`sim`)
    Relevance,
    /// Newest first
    #[default]
    Date,
}

impl SortOrder {
    /// Value sent in the `sort` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "sim",
            SortOrder::Date => "date",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" | "sim" => Ok(SortOrder::Relevance),
            "date" => Ok(SortOrder::Date),
            other => Err(format!("unknown sort order '{other}' (expected date or relevance)")),
        }
    }
}

/// Search options controlling result count and ordering
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchOptions {
    /// Number of results to request (1..=100, default: 5)
    pub max_results: usize,
    /// Ordering requested from the provider
    pub sort: SortOrder,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 5,
            sort: SortOrder::Date,
        }
    }
}

impl SearchOptions {
    /// Reject requests the provider would refuse anyway
    pub fn validate(&self, query: &str) -> Result<(), SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidRequest("query cannot be empty".into()));
        }
        if self.max_results == 0 || self.max_results > MAX_RESULT_COUNT {
            return Err(SearchError::InvalidRequest(format!(
                "result count must be between 1 and {MAX_RESULT_COUNT}, got {}",
                self.max_results
            )));
        }
        Ok(())
    }
}

/// Search results container, in provider ranking order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    /// Individual search result items
    pub items: Vec<SearchResult>,
    /// Total number of results available (if provided by the search engine)
    pub total_results: Option<u64>,
}

impl SearchResults {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Individual news search result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Headline, markup stripped
    pub title: String,
    /// Article URL
    pub link: String,
    /// Summary snippet, markup stripped
    pub description: String,
    /// Publish date exactly as the provider sent it
    pub published_raw: Option<String>,
    /// Parsed publish date; `None` when missing or unparseable
    pub published_at: Option<DateTime<FixedOffset>>,
}

impl SearchResult {
    /// Build an item from provider fields, parsing the RFC 2822 publish date.
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        description: impl Into<String>,
        published_raw: Option<String>,
    ) -> Self {
        let published_at = published_raw.as_deref().and_then(parse_pub_date);
        Self {
            title: title.into(),
            link: link.into(),
            description: description.into(),
            published_raw,
            published_at,
        }
    }
}

/// Parse the provider's `pubDate` (`Mon, 26 Sep 2016 07:50:00 +0900`).
pub fn parse_pub_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(raw.trim()).ok()
}

/// Search-related errors
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Transport failure, timeout, error status or undecodable body
    #[error("search unavailable: {0}")]
    Unavailable(String),

    /// Request rejected before any network call
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Unavailable(format!("request timed out: {err}"))
        } else {
            SearchError::Unavailable(err.to_string())
        }
    }
}
