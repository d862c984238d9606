//! Upstream text generation over an OpenAI-compatible Chat Completions API.
//!
//! Provides a `TextGenerator` trait and `ChatCompletionClient`, a single-shot
//! implementation with no retries. Callers decide what to do on failure; the
//! dialogue controller always degrades to the offline generator.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::GenerationConfig;

// ============================================================================
// TextGenerator trait
// ============================================================================

/// Abstraction over text-generation providers.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce a completion for the request. Any error means "no usable text".
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// One system + user prompt pair with an output budget.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
}

// ============================================================================
// Error types
// ============================================================================

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Missing API key")]
    MissingApiKey,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Empty completion")]
    EmptyCompletion,
}

// ============================================================================
// Chat Completions wire structs (private)
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ============================================================================
// ChatCompletionClient
// ============================================================================

/// Bearer-authenticated client for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
}

impl ChatCompletionClient {
    /// Build from config, reading the credential from the environment.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let api_key = config.api_key().unwrap_or_default();
        Self::with_base_url(config, api_key, config.base_url.clone())
    }

    /// Create a client against an explicit base URL (for testing / integration)
    pub fn with_base_url(
        config: &GenerationConfig,
        api_key: String,
        base_url: String,
    ) -> Result<Self, GenerationError> {
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = CompletionBody {
            model: &self.model,
            messages: [
                WireMessage {
                    role: "system",
                    content: &request.system,
                },
                WireMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(code = status.as_u16(), message = %message, "Generation API error");
            return Err(GenerationError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let raw = response.text().await?;
        let parsed: CompletionResponse = serde_json::from_str(&raw)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message)
            .ok_or_else(|| {
                GenerationError::MalformedResponse("missing choices[0].message".to_string())
            })?
            .content
            .unwrap_or_default();

        if content.is_empty() {
            return Err(GenerationError::EmptyCompletion);
        }

        Ok(content)
    }

    fn name(&self) -> &str {
        "chat-completions"
    }
}

// ============================================================================
// TESTS
// ============================================================================
