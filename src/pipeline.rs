//! Search → filter → prompt → complete, as one sequential run.
//!
//! A run moves through [`Stage`]s in a fixed order. Filtering never fails;
//! zero surviving items still reach the completion step through the
//! "no information" sentinel prompt. Only the two network stages can move
//! a run into [`Stage::Failed`].

use crate::config::Config;
use crate::filter::{filter_by_domain, filter_by_recency};
use crate::llm::{ChatCompletionClient, CompletionError, CompletionProvider};
use crate::prompt::{build_prompt, PromptTemplate};
use crate::search::providers::NaverNewsProvider;
use crate::search::{
    CachedSearchProvider, SearchError, SearchOptions, SearchProvider, SearchResult, SortOrder,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::Instrument;

pub const NO_RESULTS_MESSAGE: &str = "검색 결과가 없습니다.";

/// Caller-tunable knobs for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Results requested from search, also the domain filter cap
    pub result_count: usize,
    pub sort: SortOrder,
    /// Trusted link substrings; `None` disables domain filtering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_allowlist: Option<Vec<String>>,
    /// `None` disables recency filtering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age_days: Option<u32>,
    pub max_tokens: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            result_count: 5,
            sort: SortOrder::Date,
            domain_allowlist: None,
            max_age_days: None,
            max_tokens: 500,
        }
    }
}

/// Why a run stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    InvalidRequest,
    SearchUnavailable,
    CompletionUnavailable,
    EmptyResponse,
    Cancelled,
}

/// Position of a run in the state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Idle,
    Searching,
    Filtering,
    Building,
    Completing,
    Done,
    Failed(FailureReason),
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Failed(_))
    }
}

/// Final output of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    /// Items the prompt was built from, in prompt order
    pub sources: Vec<SearchResult>,
}

impl Answer {
    /// False when no source survived and the sentinel prompt was used
    pub fn is_grounded(&self) -> bool {
        !self.sources.is_empty()
    }
}

/// Pipeline-level errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("search unavailable: {0}")]
    SearchUnavailable(String),

    #[error("completion unavailable: {0}")]
    CompletionUnavailable(String),

    #[error("completion returned no text")]
    EmptyResponse,

    #[error("run cancelled by caller")]
    Cancelled,
}

impl PipelineError {
    pub fn reason(&self) -> FailureReason {
        match self {
            PipelineError::InvalidRequest(_) => FailureReason::InvalidRequest,
            PipelineError::SearchUnavailable(_) => FailureReason::SearchUnavailable,
            PipelineError::CompletionUnavailable(_) => FailureReason::CompletionUnavailable,
            PipelineError::EmptyResponse => FailureReason::EmptyResponse,
            PipelineError::Cancelled => FailureReason::Cancelled,
        }
    }

    /// Message safe to show an end user; never includes upstream detail
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::InvalidRequest(_) => "질문 또는 검색 옵션이 올바르지 않습니다.",
            PipelineError::SearchUnavailable(_) => "뉴스 검색 중 오류가 발생했습니다.",
            PipelineError::CompletionUnavailable(_) | PipelineError::EmptyResponse => {
                "답변을 생성하는 데 문제가 발생했습니다. 나중에 다시 시도해 주세요."
            }
            PipelineError::Cancelled => "요청이 취소되었습니다.",
        }
    }
}

impl From<SearchError> for PipelineError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidRequest(msg) => PipelineError::InvalidRequest(msg),
            SearchError::Unavailable(msg) => PipelineError::SearchUnavailable(msg),
        }
    }
}

impl From<CompletionError> for PipelineError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Unavailable(msg) => PipelineError::CompletionUnavailable(msg),
            CompletionError::EmptyResponse => PipelineError::EmptyResponse,
        }
    }
}

/// Progress reported by [`Pipeline::start`]
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// The run entered a new stage
    Stage(Stage),
    /// The run ended; always the last event
    Finished(Result<Answer, PipelineError>),
}

/// Retrieval-augmented answering pipeline.
///
/// UI-agnostic: callers either await [`Pipeline::run`] or consume the
/// events of [`Pipeline::start`].
#[derive(Clone)]
pub struct Pipeline {
    search: Arc<dyn SearchProvider>,
    completion: Arc<dyn CompletionProvider>,
    template: PromptTemplate,
}

impl Pipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        completion: Arc<dyn CompletionProvider>,
        template: PromptTemplate,
    ) -> Self {
        Self {
            search,
            completion,
            template,
        }
    }

    /// Assemble the HTTP-backed pipeline from configuration.
    ///
    /// Search results are memoized when `search.cache_ttl_secs` is non-zero.
    pub fn from_config(config: &Config) -> Result<Self> {
        let naver: Arc<dyn SearchProvider> = Arc::new(
            NaverNewsProvider::new(&config.search).context("Failed to build search client")?,
        );

        let search: Arc<dyn SearchProvider> = if config.search.cache_ttl_secs > 0 {
            Arc::new(CachedSearchProvider::new(
                naver,
                Duration::from_secs(config.search.cache_ttl_secs),
            ))
        } else {
            naver
        };

        let completion = ChatCompletionClient::new(config.completion.clone())
            .context("Failed to build completion client")?;

        tracing::info!(
            search_endpoint = %config.search.endpoint(),
            model = %config.completion.model,
            cache_ttl_secs = config.search.cache_ttl_secs,
            "pipeline initialized"
        );

        Ok(Self::new(search, Arc::new(completion), config.prompt.clone()))
    }

    /// Run to completion using the current time for recency filtering
    pub async fn run(&self, query: &str, options: &PipelineOptions) -> Result<Answer, PipelineError> {
        self.run_at(query, options, Utc::now()).await
    }

    /// Run to completion with an explicit "now"
    pub async fn run_at(
        &self,
        query: &str,
        options: &PipelineOptions,
        now: DateTime<Utc>,
    ) -> Result<Answer, PipelineError> {
        self.execute(query, options, now, |_| true).await
    }

    /// Start a run in the background and report progress.
    ///
    /// Dropping the receiver cancels the run at the next stage boundary.
    pub fn start(
        &self,
        query: impl Into<String>,
        options: PipelineOptions,
    ) -> mpsc::UnboundedReceiver<PipelineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let pipeline = self.clone();
        let query = query.into();

        tokio::spawn(async move {
            let stage_tx = tx.clone();
            let result = pipeline
                .execute(&query, &options, Utc::now(), move |stage| {
                    stage_tx.send(PipelineEvent::Stage(stage)).is_ok()
                })
                .await;
            let _ = tx.send(PipelineEvent::Finished(result));
        });

        rx
    }

    async fn execute<F>(
        &self,
        query: &str,
        options: &PipelineOptions,
        now: DateTime<Utc>,
        mut on_stage: F,
    ) -> Result<Answer, PipelineError>
    where
        F: FnMut(Stage) -> bool + Send,
    {
        let span = tracing::info_span!("pipeline", run_id = %uuid::Uuid::new_v4());

        async move {
            let result = self.advance(query, options, now, &mut on_stage).await;
            match &result {
                Ok(answer) => {
                    on_stage(Stage::Done);
                    tracing::info!(sources = answer.sources.len(), "pipeline done");
                }
                Err(err) => {
                    on_stage(Stage::Failed(err.reason()));
                    tracing::warn!(error = %err, "pipeline failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn advance<F>(
        &self,
        query: &str,
        options: &PipelineOptions,
        now: DateTime<Utc>,
        on_stage: &mut F,
    ) -> Result<Answer, PipelineError>
    where
        F: FnMut(Stage) -> bool + Send,
    {
        let query = query.trim();
        if query.is_empty() {
            return Err(PipelineError::InvalidRequest("query cannot be empty".into()));
        }

        enter(on_stage, Stage::Searching)?;
        let search_options = SearchOptions {
            max_results: options.result_count,
            sort: options.sort,
        };
        let results = self.search.search(query, &search_options).await?;
        tracing::debug!(fetched = results.items.len(), "search stage finished");

        enter(on_stage, Stage::Filtering)?;
        let mut items = results.items;
        if let Some(allowlist) = &options.domain_allowlist {
            items = filter_by_domain(&items, allowlist, options.result_count);
        }
        if let Some(max_age_days) = options.max_age_days {
            items = filter_by_recency(&items, max_age_days, &now);
        }
        tracing::debug!(kept = items.len(), "filter stage finished");

        enter(on_stage, Stage::Building)?;
        let prompt = build_prompt(query, &items, &self.template);

        enter(on_stage, Stage::Completing)?;
        let text = self.completion.complete(&prompt, options.max_tokens).await?;

        Ok(Answer {
            text,
            sources: items,
        })
    }
}

fn enter<F>(on_stage: &mut F, stage: Stage) -> Result<(), PipelineError>
where
    F: FnMut(Stage) -> bool,
{
    tracing::debug!(stage = ?stage, "entering stage");
    if on_stage(stage) {
        Ok(())
    } else {
        tracing::debug!(stage = ?stage, "event receiver dropped, stopping");
        Err(PipelineError::Cancelled)
    }
}
