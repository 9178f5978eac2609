//! The external language-model capability: send a prompt, get text and
//! token counts back, or an error.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use crate::types::UsageStats;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Missing API key for {provider_name}: {env_var} environment variable is not set")]
    MissingApiKey {
        provider_name: String,
        env_var: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LlmProvider {
    #[default]
    Gemini,
    Openai,
    Grok,
}

pub struct LlmConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl LlmProvider {
    pub fn config(&self) -> LlmConfig {
        match self {
            LlmProvider::Gemini => LlmConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
                model: "gemini-2.5-flash-lite",
                env_var: "GEMINI_API_KEY",
            },
            LlmProvider::Openai => LlmConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-4o-mini",
                env_var: "OPENAI_API_KEY",
            },
            LlmProvider::Grok => LlmConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "Gemini",
            LlmProvider::Openai => "OpenAI",
            LlmProvider::Grok => "Grok",
        }
    }

    /// Validate that the API key is set for this provider
    pub fn validate_api_key(&self) -> Result<String, LlmError> {
        let config = self.config();
        std::env::var(config.env_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey {
                provider_name: self.name().to_string(),
                env_var: config.env_var.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    /// `None` when the provider did not report usage.
    pub usage: Option<UsageStats>,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn model(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<Completion, LlmError>;
}

/// Any OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatCompletionsModel {
    client: reqwest::Client,
    api_url: String,
    model: String,
    api_key: String,
}

impl ChatCompletionsModel {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(
        api_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_provider(provider: LlmProvider) -> Result<Self, LlmError> {
        let config = provider.config();
        let api_key = provider.validate_api_key()?;
        Self::new(config.api_url, config.model, api_key)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

impl From<ChatUsage> for UsageStats {
    fn from(usage: ChatUsage) -> Self {
        UsageStats {
            prompt_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

fn parse_chat_response(body: &str) -> Result<Completion, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("{e}: {body}")))?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("no content in response".into()))?;

    Ok(Completion {
        text,
        usage: response.usage.map(UsageStats::from),
    })
}

#[async_trait]
impl LanguageModel for ChatCompletionsModel {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<Completion, LlmError> {
        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "Sending completion request");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt,
                    },
                ],
                "temperature": 0.3,
            }))
            .send()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to make http request"))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_chat_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_provider_is_gemini_flash_lite() {
        let config = LlmProvider::default().config();
        assert_eq!(config.model, "gemini-2.5-flash-lite");
        assert_eq!(config.env_var, "GEMINI_API_KEY");
    }

    #[test]
    fn test_parse_response_with_usage() {
        let completion = parse_chat_response(
            r#"{
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Audience loved it"}}],
                "usage": {"prompt_tokens": 1200, "completion_tokens": 300, "total_tokens": 1500}
            }"#,
        )
        .unwrap();
        assert_eq!(completion.text, "Audience loved it");
        assert_eq!(
            completion.usage,
            Some(UsageStats {
                prompt_tokens: 1200,
                output_tokens: 300,
                total_tokens: 1500,
            })
        );
    }

    #[test]
    fn test_parse_response_without_usage() {
        let completion =
            parse_chat_response(r#"{"choices": [{"message": {"content": "ok"}}]}"#).unwrap();
        assert_eq!(completion.usage, None);
    }

    #[test]
    fn test_parse_response_without_content() {
        let err = parse_chat_response(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }
}
