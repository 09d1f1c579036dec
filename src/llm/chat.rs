use crate::config::CompletionConfig;
use crate::llm::types::{ChatRequest, ChatResponse};
use crate::llm::{CompletionError, CompletionProvider};
use crate::prompt::Prompt;
use reqwest::Client;
use std::time::Duration;

/// Chat-completions API client (`POST /v1/chat/completions`, bearer auth)
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    config: CompletionConfig,
}

impl ChatCompletionClient {
    pub fn new(config: CompletionConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ChatCompletionClient {
    async fn complete(&self, prompt: &Prompt, max_tokens: u32) -> Result<String, CompletionError> {
        let url = self.url();

        tracing::debug!(
            api_base = %self.config.api_base,
            model = %self.config.model,
            max_tokens,
            sentinel = prompt.is_sentinel(),
            "chat completion request"
        );

        let request_body = ChatRequest::single_turn(
            self.config.model.clone(),
            prompt.text(),
            max_tokens,
            self.config.temperature,
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::warn!(
                status = %status,
                error = %crate::logging::redact_known(&error_text, &[&self.config.api_key]),
                "completion api returned error"
            );

            let detail = match status.as_u16() {
                401 | 403 => format!("unauthorized ({status}): check the completion api_key"),
                429 => format!("rate limited ({status})"),
                500..=599 => format!("server error ({status})"),
                _ => format!("request failed ({status})"),
            };
            return Err(CompletionError::Unavailable(detail));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "completion api returned an undecodable body");
            CompletionError::Unavailable(format!("malformed response: {e}"))
        })?;

        match body.first_text() {
            Some(text) => {
                tracing::debug!(answer_chars = text.chars().count(), "chat completion finished");
                Ok(text.to_string())
            }
            None => {
                tracing::warn!("completion response had no usable choice");
                Err(CompletionError::EmptyResponse)
            }
        }
    }
}
