//! Chat-completions client for the DeepSeek API.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use stemdraw_core::{PipelineError, PipelineResult};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for the DeepSeek API.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// One message in a chat exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Thin wrapper over `POST /chat/completions`.
#[derive(Debug, Clone)]
pub struct DeepSeekClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl DeepSeekClient {
    pub fn new(config: LlmConfig) -> PipelineResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| PipelineError::LlmError(format!("client build failed: {}", err)))?;
        Ok(Self { http, config })
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a chat exchange and return the assistant's reply text.
    pub async fn chat(&self, messages: &[ChatMessage]) -> PipelineResult<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: 0.2,
        };
        debug!(model = %self.config.model, messages = messages.len(), "LLM request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| PipelineError::LlmError(format!("request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "LLM request rejected");
            return Err(PipelineError::LlmError(format!(
                "API returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| PipelineError::LlmError(format!("malformed response: {}", err)))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PipelineError::LlmError("response contained no choices".to_string()))
    }
}

/// Pull the JSON object out of a chat reply, tolerating code fences and
/// surrounding prose.
pub(crate) fn extract_json(content: &str) -> PipelineResult<&str> {
    let start = content.find('{');
    let end = content.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&content[start..=end]),
        _ => Err(PipelineError::LlmError(
            "reply contained no JSON object".to_string(),
        )),
    }
}
