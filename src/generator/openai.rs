//! OpenAI-compatible Chat Completions generator
//!
//! Sends the recommended prompts with temperature 0 and returns the first
//! choice's content. Enabled with the `openai` feature.

use crate::error::{Result, ScribeError};
use crate::generator::{recommended_system_prompt, recommended_user_prompt, CronGenerator};
use async_trait::async_trait;
use serde::Deserialize;

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Generator backed by a Chat Completions endpoint
pub struct OpenAiGenerator {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiGenerator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: "https://api.openai.com".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at another OpenAI-compatible server; a trailing `/v1` is dropped
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url
            .trim_end_matches('/')
            .trim_end_matches("/v1")
            .trim_end_matches('/')
            .to_string();
        self
    }
}

#[async_trait]
impl CronGenerator for OpenAiGenerator {
    async fn generate_cron(&self, input: &str) -> Result<String> {
        let request = serde_json::json!({
            "model": self.model,
            "temperature": 0.0,
            "messages": [
                {"role": "system", "content": recommended_system_prompt()},
                {"role": "user", "content": recommended_user_prompt(input)},
            ],
        });

        let url = format!("{}/v1/chat/completions", self.base_url);
        tracing::debug!(url = %url, model = %self.model, "Requesting cron completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScribeError::Generator(format!("Failed to send request to {url}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScribeError::Generator(format!("Failed to read response: {e}")))?;
        if !status.is_success() {
            return Err(ScribeError::Generator(format!(
                "OpenAI API error at {url} ({status}): {body}"
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| ScribeError::Generator("no content choices returned".to_string()))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
