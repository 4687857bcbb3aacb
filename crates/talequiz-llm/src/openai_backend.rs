//! OpenAI-compatible chat-completions backend
//!
//! Speaks the `<base>/chat/completions` dialect served by LM Studio, llama.cpp,
//! vLLM and most hosted gateways.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use talequiz_config::Config;
use talequiz_utils::error::ConnectivityError;

use crate::http_client::HttpClient;
use crate::types::{ChatBackend, ChatParams, Message};

const PROVIDER: &str = "openai-compatible";

/// Backend for any OpenAI-compatible completion endpoint
#[derive(Clone)]
pub struct OpenAiCompatBackend {
    client: HttpClient,
    url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl OpenAiCompatBackend {
    /// Create a backend posting to `url` (the full chat-completions URL).
    ///
    /// # Errors
    ///
    /// Returns `ConnectivityError::Misconfiguration` if the HTTP client cannot be constructed
    pub fn new(
        url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, ConnectivityError> {
        Ok(Self {
            client: HttpClient::new(max_retries)?,
            url: url.into(),
            model: model.into(),
            api_key,
            timeout,
        })
    }

    /// Create a backend from the `[llm]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `ConnectivityError::Misconfiguration` if `api_key_env` names an
    /// unset variable or the HTTP client cannot be constructed
    pub fn new_from_config(config: &Config) -> Result<Self, ConnectivityError> {
        let api_key = match config.llm.api_key_env.as_deref() {
            Some(var) => Some(std::env::var(var).map_err(|_| {
                ConnectivityError::Misconfiguration(format!(
                    "API key not found in environment variable '{var}'. \
                     Set it or remove api_key_env from [llm]."
                ))
            })?),
            None => None,
        };

        Self::new(
            config.completions_url(),
            config.llm.model.clone(),
            api_key,
            Duration::from_secs(config.llm.timeout_secs),
            config.llm.max_retries,
        )
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_body(&self, messages: Vec<Message>, params: ChatParams) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            stream: false,
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiCompatBackend {
    async fn complete(
        &self,
        messages: Vec<Message>,
        params: ChatParams,
    ) -> Result<String, ConnectivityError> {
        debug!(
            provider = PROVIDER,
            model = %self.model,
            max_tokens = params.max_tokens,
            temperature = params.temperature,
            messages = messages.len(),
            "Invoking completion endpoint"
        );

        let body = self.request_body(messages, params);
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = self
            .client
            .execute_with_retry(request, self.timeout, PROVIDER)
            .await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ConnectivityError::Transport(format!("Failed to read response body: {e}")))?;

        let content = extract_content(&bytes)?;
        debug!(provider = PROVIDER, chars = content.chars().count(), "Completion received");
        Ok(content)
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

/// Pull `choices[0].message.content` out of a response body
fn extract_content(body: &[u8]) -> Result<String, ConnectivityError> {
    let envelope: ChatResponse = serde_json::from_slice(body).map_err(|e| {
        ConnectivityError::MalformedEnvelope(format!("Failed to decode response JSON: {e}"))
    })?;

    let choice = envelope.choices.into_iter().next().ok_or_else(|| {
        ConnectivityError::MalformedEnvelope("response missing choices[0]".to_string())
    })?;

    choice.message.content.ok_or_else(|| {
        ConnectivityError::MalformedEnvelope("response missing content in choices[0]".to_string())
    })
}

/// Request body
#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
