use crate::config::SearchConfig;
use crate::search::{SearchError, SearchOptions, SearchProvider, SearchResult, SearchResults};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Naver news search API provider
///
/// Sends `X-Naver-Client-Id` / `X-Naver-Client-Secret` with every request.
/// Documentation: https://developers.naver.com/docs/serviceapi/search/news/news.md
pub struct NaverNewsProvider {
    client: reqwest::Client,
    endpoint: String,
    client_id: String,
    client_secret: String,
}

impl NaverNewsProvider {
    /// Create a provider from explicit configuration
    pub fn new(config: &SearchConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    fn normalize(raw: RawItem) -> SearchResult {
        // Publisher URL first; `link` is often the portal's copy.
        let link = if raw.originallink.trim().is_empty() {
            raw.link
        } else {
            raw.originallink
        };

        SearchResult::new(
            strip_markup(&raw.title),
            link,
            strip_markup(&raw.description),
            raw.pub_date.filter(|d| !d.trim().is_empty()),
        )
    }
}

/// Remove highlight tags and decode the entities the provider emits.
pub fn strip_markup(input: &str) -> String {
    TAG_RE
        .replace_all(input, "")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    total: Option<u64>,
    items: Option<Vec<RawItem>>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    originallink: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

#[async_trait::async_trait]
impl SearchProvider for NaverNewsProvider {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResults, SearchError> {
        options.validate(query)?;

        tracing::debug!(
            query = %query,
            max_results = options.max_results,
            sort = options.sort.as_param(),
            "performing naver news search"
        );

        let response = self
            .client
            .get(&self.endpoint)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .header("Accept", "application/json")
            .query(&[
                ("query", query),
                ("display", &options.max_results.to_string()),
                ("sort", options.sort.as_param()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            tracing::warn!(
                status = %status,
                error = %crate::logging::redact_known(&error_text, &[&self.client_secret]),
                "naver search api error"
            );

            return Err(SearchError::Unavailable(format!("HTTP {}", status)));
        }

        let body = response.text().await?;
        let parsed: RawResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "naver search returned a non-JSON body");
            SearchError::Unavailable(format!("malformed response: {e}"))
        })?;

        let Some(raw_items) = parsed.items else {
            tracing::debug!(query = %query, "naver response has no items collection");
            return Ok(SearchResults::empty());
        };

        let items: Vec<SearchResult> = raw_items
            .into_iter()
            .take(options.max_results)
            .map(Self::normalize)
            .collect();

        tracing::debug!(
            query = %query,
            result_count = items.len(),
            "naver search completed"
        );

        Ok(SearchResults {
            items,
            total_results: parsed.total,
        })
    }
}
