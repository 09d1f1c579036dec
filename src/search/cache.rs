use crate::search::{SearchError, SearchOptions, SearchProvider, SearchResults, SortOrder};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const MAX_CACHE_ENTRIES: usize = 100;

/// Exact (query, count, sort) key; no normalisation of the query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    query: String,
    max_results: usize,
    sort: SortOrder,
}

/// Cached search result with timestamp
struct CachedResult {
    results: SearchResults,
    timestamp: Instant,
}

/// Time-boxed memoization in front of another provider.
///
/// Only successful responses are stored. An entry older than the TTL is
/// never served; it is replaced by the next fresh search.
pub struct CachedSearchProvider {
    inner: Arc<dyn SearchProvider>,
    ttl: Duration,
    cache: Mutex<HashMap<CacheKey, CachedResult>>,
}

impl CachedSearchProvider {
    pub fn new(inner: Arc<dyn SearchProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of entries currently held, expired ones included
    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl SearchProvider for CachedSearchProvider {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResults, SearchError> {
        let key = CacheKey {
            query: query.to_string(),
            max_results: options.max_results,
            sort: options.sort,
        };

        {
            let cache = self.cache.lock().await;
            if let Some(cached) = cache.get(&key) {
                let age = cached.timestamp.elapsed();
                if age < self.ttl {
                    tracing::debug!(
                        query = %query,
                        age_secs = age.as_secs(),
                        "returning cached search results"
                    );
                    return Ok(cached.results.clone());
                }
            }
        }

        tracing::debug!(query = %query, "performing fresh search");
        let results = self.inner.search(query, options).await?;

        {
            let mut cache = self.cache.lock().await;
            cache.insert(
                key,
                CachedResult {
                    results: results.clone(),
                    timestamp: Instant::now(),
                },
            );

            if cache.len() > MAX_CACHE_ENTRIES {
                if let Some(oldest_key) = cache
                    .iter()
                    .min_by_key(|(_, v)| v.timestamp)
                    .map(|(k, _)| k.clone())
                {
                    cache.remove(&oldest_key);
                    tracing::trace!("evicted oldest cache entry");
                }
            }
        }

        Ok(results)
    }
}
