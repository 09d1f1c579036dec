//! Shared fixtures: stub providers and mock-server configuration.

#![allow(dead_code)]

use newsrag::config::{CompletionConfig, Config, SearchConfig};
use newsrag::llm::{CompletionError, CompletionProvider};
use newsrag::prompt::Prompt;
use newsrag::search::{SearchError, SearchOptions, SearchProvider, SearchResult, SearchResults};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const API_KEY: &str = "test-completion-key";
pub const MODEL: &str = "test-model";

/// Config pointing both endpoints at mock servers, caching off
pub fn mock_config(search_uri: &str, completion_uri: &str) -> Config {
    Config {
        search: SearchConfig {
            client_id: CLIENT_ID.into(),
            client_secret: CLIENT_SECRET.into(),
            api_base: search_uri.into(),
            timeout_secs: 1,
            cache_ttl_secs: 0,
        },
        completion: CompletionConfig {
            api_key: API_KEY.into(),
            api_base: completion_uri.into(),
            model: MODEL.into(),
            temperature: None,
            timeout_secs: 1,
        },
        ..Config::default()
    }
}

/// `n` items on `domain`, published on consecutive days before 2025-10-16
pub fn news_items(n: usize, domain: &str) -> Vec<SearchResult> {
    (1..=n)
        .map(|i| {
            SearchResult::new(
                format!("인공지능 기사 {i}"),
                format!("https://{domain}/view/{i}"),
                format!("인공지능 관련 요약 {i}"),
                Some(format!("{}, {:02} Oct 2025 09:00:00 +0900", weekday(16 - i as u32), 16 - i)),
            )
        })
        .collect()
}

fn weekday(day_of_october_2025: u32) -> &'static str {
    // 2025-10-01 was a Wednesday.
    const NAMES: [&str; 7] = ["Wed", "Thu", "Fri", "Sat", "Sun", "Mon", "Tue"];
    NAMES[((day_of_october_2025 - 1) % 7) as usize]
}

/// Provider JSON body for the given items
pub fn naver_body(items: &[SearchResult]) -> Value {
    let items: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "title": item.title,
                "originallink": item.link,
                "link": item.link,
                "description": item.description,
                "pubDate": item.published_raw,
            })
        })
        .collect();

    json!({
        "lastBuildDate": "Thu, 16 Oct 2025 10:00:00 +0900",
        "total": items.len(),
        "start": 1,
        "display": items.len(),
        "items": items,
    })
}

/// Chat-completions JSON body with one choice
pub fn chat_body(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": MODEL,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    })
}

/// Search stub returning fixed items (or failing), counting calls
pub struct StubSearch {
    items: Vec<SearchResult>,
    fail: Option<String>,
    pub calls: AtomicUsize,
}

impl StubSearch {
    pub fn returning(items: Vec<SearchResult>) -> Self {
        Self {
            items,
            fail: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            items: Vec::new(),
            fail: Some(detail.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SearchProvider for StubSearch {
    async fn search(
        &self,
        _query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResults, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(detail) = &self.fail {
            return Err(SearchError::Unavailable(detail.clone()));
        }
        Ok(SearchResults {
            items: self.items.iter().take(options.max_results).cloned().collect(),
            total_results: Some(self.items.len() as u64),
        })
    }
}

enum Reply {
    Text(String),
    Unavailable(String),
    Empty,
}

/// Completion stub recording every prompt it receives
pub struct StubCompletion {
    reply: Reply,
    pub prompts: Mutex<Vec<Prompt>>,
}

impl StubCompletion {
    pub fn answering(text: &str) -> Self {
        Self::with(Reply::Text(text.to_string()))
    }

    pub fn unavailable(detail: &str) -> Self {
        Self::with(Reply::Unavailable(detail.to_string()))
    }

    pub fn empty() -> Self {
        Self::with(Reply::Empty)
    }

    fn with(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for StubCompletion {
    async fn complete(&self, prompt: &Prompt, _max_tokens: u32) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Unavailable(detail) => Err(CompletionError::Unavailable(detail.clone())),
            Reply::Empty => Err(CompletionError::EmptyResponse),
        }
    }
}
