//! LLM client: the single point of entry for all model provider calls.
//!
//! ARCHITECTURAL RULE: No other module may call the provider API directly.
//! All LLM interactions MUST go through the `ModelClient` trait so tests can
//! substitute a scripted client.
//!
//! The provider speaks the OpenAI-compatible chat-completions protocol
//! (Groq by default). No retries: one request in, one reply or one error out.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

pub mod prompts;

#[cfg(test)]
pub mod scripted;

/// Key value shipped in sample configs. Treated the same as no key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_GROQ_API_KEY";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2048;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ModelCallError {
    #[error("AI service is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model reply contained no message content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One `{role, content}` entry of a chat-completions request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Narrow seam over the model provider.
///
/// Callers MUST check `is_enabled()` before calling and report
/// "not configured" themselves instead of attempting the call.
#[async_trait]
pub trait ModelClient: Send + Sync {
    fn is_enabled(&self) -> bool;

    /// Sends an ordered message list and returns the assistant's reply text.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ModelCallError>;

    /// Two-message convenience: optional system instruction, then the user prompt.
    async fn complete(&self, system: &str, user: &str) -> Result<String, ModelCallError> {
        self.chat(&build_messages(system, user)).await
    }
}

/// Builds the message list for a single-turn prompt. The system message is
/// omitted when blank.
pub fn build_messages(system: &str, user: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if !system.trim().is_empty() {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(user));
    messages
}

/// A key is usable when it is non-blank and not the sample placeholder.
pub fn is_usable_key(api_key: &str) -> bool {
    let key = api_key.trim();
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Chat-completions client for Groq's OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self, ModelCallError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ModelClient for GroqClient {
    fn is_enabled(&self) -> bool {
        is_usable_key(&self.api_key)
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ModelCallError> {
        if !self.is_enabled() {
            return Err(ModelCallError::NotConfigured);
        }

        let request_body = ChatCompletionRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages,
        };

        info!(
            "Sending chat completion: model={}, messages={}",
            self.model,
            messages.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            error!("Model provider returned {status}: {message}");
            return Err(ModelCallError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let content = extract_content(&body)?;
        info!("Chat completion succeeded, content length: {}", content.len());
        Ok(content)
    }
}

/// Pulls `choices[0].message.content` out of a chat-completions body.
fn extract_content(body: &str) -> Result<String, ModelCallError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)?;

    if let Some(usage) = &parsed.usage {
        debug!(
            "Token usage: prompt_tokens={}, completion_tokens={}",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(ModelCallError::EmptyContent)
}
