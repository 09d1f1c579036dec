//! Command-line front end: one query in, one answer out.

use crate::config::{self, Config};
use crate::pipeline::{Answer, Pipeline, PipelineOptions, NO_RESULTS_MESSAGE};
use crate::search::SortOrder;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

const DEFAULT_QUERY: &str = "최근 AI 기술의 발전 동향은?";

#[derive(Debug, Parser)]
#[command(name = "newsrag", version, about = "Answer questions from live news search results")]
pub struct Cli {
    /// Question to answer
    #[arg(default_value = DEFAULT_QUERY)]
    pub query: String,

    /// Number of search results to request
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Result ordering: date or relevance
    #[arg(long)]
    pub sort: Option<SortOrder>,

    /// Trusted link substring; repeat to allow several
    #[arg(long = "allow-domain", value_name = "DOMAIN")]
    pub allow_domains: Vec<String>,

    /// Drop articles older than this many days
    #[arg(long)]
    pub max_age_days: Option<u32>,

    /// Completion token budget
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Config file (default: <config_dir>/newsrag/config.toml)
    #[arg(long, env = "NEWSRAG_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "NAVER_CLIENT_ID", hide_env_values = true)]
    pub naver_client_id: Option<String>,

    #[arg(long, env = "NAVER_CLIENT_SECRET", hide_env_values = true)]
    pub naver_client_secret: Option<String>,

    #[arg(long, env = "COMPLETION_API_KEY", hide_env_values = true)]
    pub completion_api_key: Option<String>,

    /// Wrap the answer at this many columns (0 disables wrapping)
    #[arg(long, default_value_t = 100)]
    pub width: usize,
}

impl Cli {
    /// Apply credential overrides on top of the loaded file
    pub fn apply_credentials(&self, config: &mut Config) {
        if let Some(id) = &self.naver_client_id {
            config.search.client_id = id.clone();
        }
        if let Some(secret) = &self.naver_client_secret {
            config.search.client_secret = secret.clone();
        }
        if let Some(key) = &self.completion_api_key {
            config.completion.api_key = key.clone();
        }
    }

    /// Merge flags over the configured defaults
    pub fn options(&self, defaults: &PipelineOptions) -> PipelineOptions {
        let mut options = defaults.clone();
        if let Some(count) = self.count {
            options.result_count = count;
        }
        if let Some(sort) = self.sort {
            options.sort = sort;
        }
        if !self.allow_domains.is_empty() {
            options.domain_allowlist = Some(self.allow_domains.clone());
        }
        if let Some(days) = self.max_age_days {
            options.max_age_days = Some(days);
        }
        if let Some(max_tokens) = self.max_tokens {
            options.max_tokens = max_tokens;
        }
        options
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_or_create_config()?,
    };
    cli.apply_credentials(&mut config);

    let log_guard = crate::logging::init(&config)?;

    let pipeline = Pipeline::from_config(&config)?;
    let options = cli.options(&config.defaults);

    match pipeline.run(&cli.query, &options).await {
        Ok(answer) => {
            println!("{}", render_answer(&answer, cli.width));
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "query failed");
            eprintln!("{}", err.user_message());
            drop(log_guard);
            std::process::exit(1);
        }
    }
}

/// Answer text followed by a numbered source list
pub fn render_answer(answer: &Answer, width: usize) -> String {
    let mut out = String::new();

    if !answer.is_grounded() {
        out.push_str(NO_RESULTS_MESSAGE);
        out.push_str("\n\n");
    }

    if width == 0 {
        out.push_str(answer.text.trim());
    } else {
        out.push_str(&textwrap::fill(answer.text.trim(), width));
    }

    if answer.is_grounded() {
        out.push_str("\n\n출처:\n");
        for (idx, source) in answer.sources.iter().enumerate() {
            out.push_str(&format!("{}. {}\n   {}\n", idx + 1, source.title, source.link));
        }
    }

    out
}
