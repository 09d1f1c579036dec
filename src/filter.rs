//! Post-search filtering of result items.
//!
//! Filters never fail: they only narrow the item list, possibly to nothing.

use crate::search::SearchResult;
use chrono::{DateTime, Duration, TimeZone};

/// Keep items whose link contains at least one allow-list entry.
///
/// Matching is a case-sensitive substring test against the whole link.
/// An empty allow-list passes nothing. Output keeps input order and is
/// truncated to the first `cap` matches.
pub fn filter_by_domain<S: AsRef<str>>(
    items: &[SearchResult],
    allowlist: &[S],
    cap: usize,
) -> Vec<SearchResult> {
    if allowlist.is_empty() {
        tracing::debug!(input = items.len(), "empty domain allow-list, dropping all items");
        return Vec::new();
    }

    items
        .iter()
        .filter(|item| {
            let allowed = allowlist
                .iter()
                .any(|domain| item.link.contains(domain.as_ref()));
            if !allowed {
                tracing::trace!(link = %item.link, "filtered out by domain allow-list");
            }
            allowed
        })
        .take(cap)
        .cloned()
        .collect()
}

/// Keep items published at most `max_age_days` before `now`.
///
/// Items without a parseable publish date are dropped.
pub fn filter_by_recency<Tz: TimeZone>(
    items: &[SearchResult],
    max_age_days: u32,
    now: &DateTime<Tz>,
) -> Vec<SearchResult> {
    let limit = Duration::days(i64::from(max_age_days));

    items
        .iter()
        .filter(|item| match item.published_at {
            Some(published) => {
                let age = now.fixed_offset() - published;
                let fresh = age <= limit;
                if !fresh {
                    tracing::trace!(link = %item.link, age_days = age.num_days(), "filtered out as stale");
                }
                fresh
            }
            None => {
                tracing::trace!(
                    link = %item.link,
                    raw = ?item.published_raw,
                    "filtered out: publish date missing or unparseable"
                );
                false
            }
        })
        .cloned()
        .collect()
}
