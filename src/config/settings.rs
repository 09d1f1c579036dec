use crate::pipeline::PipelineOptions;
use crate::prompt::PromptTemplate;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Write debug logs to a file
    #[serde(default)]
    pub debug: bool,

    /// Log file (or directory) override; defaults next to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_rotation: Option<DebugLogRotation>,

    /// Rotated files to keep (default: 7 daily, 20 session)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_keep: Option<usize>,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub completion: CompletionConfig,

    #[serde(default)]
    pub prompt: PromptTemplate,

    /// Pipeline options used when the caller does not override them
    #[serde(default)]
    pub defaults: PipelineOptions,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// How debug log files are rotated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DebugLogRotation {
    /// One file, appended forever
    None,
    Daily,
    /// A new file per process run
    Session,
}

/// News search endpoint credentials and limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    pub client_id: String,
    pub client_secret: String,

    #[serde(default = "default_search_api_base")]
    pub api_base: String,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,

    /// Result cache lifetime; 0 disables caching
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            client_id: "YOUR_CLIENT_ID".to_string(),
            client_secret: "YOUR_CLIENT_SECRET".to_string(),
            api_base: default_search_api_base(),
            timeout_secs: default_search_timeout(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl SearchConfig {
    pub fn endpoint(&self) -> String {
        format!("{}/v1/search/news.json", self.api_base.trim_end_matches('/'))
    }
}

/// Completion endpoint credentials and model selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionConfig {
    pub api_key: String,

    #[serde(default = "default_completion_api_base")]
    pub api_base: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: "YOUR_API_KEY_HERE".to_string(),
            api_base: default_completion_api_base(),
            model: default_model(),
            temperature: None,
            timeout_secs: default_completion_timeout(),
        }
    }
}

fn default_search_api_base() -> String {
    "https://openapi.naver.com".to_string()
}

fn default_search_timeout() -> u64 {
    10
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_completion_api_base() -> String {
    "https://api.together.xyz".to_string()
}

fn default_model() -> String {
    "meta-llama/Llama-3.2-90B-Vision-Instruct-Turbo".to_string()
}

fn default_completion_timeout() -> u64 {
    30
}
