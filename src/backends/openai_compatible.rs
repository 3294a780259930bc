//! Client for any server speaking the OpenAI chat completions API.
//!
//! Hosted OpenAI, vLLM and most self-hosted inference servers expose the same
//! `/chat/completions` endpoint, so one client covers all grader deployments.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::error::GraderError;
use crate::provider::GradingProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

/// Configuration for an OpenAI-compatible grader endpoint.
#[derive(Debug)]
pub struct OpenAICompatibleConfig {
    /// Base URL of the API, e.g. `https://api.openai.com/v1/`.
    pub base_url: String,
    /// Bearer token. Some local servers accept any value.
    pub api_key: SecretString,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature for response randomness.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate in responses.
    pub max_tokens: Option<u32>,
    /// System prompt prepended to every request.
    pub system: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// OpenAI-compatible grader client.
///
/// The client uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct OpenAICompatible {
    pub config: Arc<OpenAICompatibleConfig>,
    pub client: Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMsg,
}

#[derive(Deserialize, Debug)]
struct ChatMsg {
    content: Option<String>,
}

impl OpenAICompatible {
    pub fn new(config: OpenAICompatibleConfig) -> Result<Self, GraderError> {
        let mut builder = Client::builder();
        if let Some(sec) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(sec));
        }
        Ok(Self::with_client(builder.build()?, config))
    }

    /// Creates a client with a custom HTTP client.
    pub fn with_client(client: Client, config: OpenAICompatibleConfig) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Builds a client from a resolved model server entry.
    pub fn from_server(
        server: &ServerConfig,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, GraderError> {
        Self::new(OpenAICompatibleConfig {
            base_url: server
                .openai_api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: server.resolve_api_key()?,
            model: server.openai_model.clone(),
            temperature: server.temperature,
            max_tokens: server.max_tokens,
            system: server.system.clone(),
            timeout_seconds,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl GradingProvider for OpenAICompatible {
    async fn complete(&self, prompt: &str) -> Result<String, GraderError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.config.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let body = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        };

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("grader request payload: {}", json);
            }
        }

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        log::debug!("grader HTTP status: {}", status);
        let text = resp.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GraderError::AuthError(format!("{status}: {text}")));
        }
        if !status.is_success() {
            return Err(GraderError::ProviderError(format!("{status}: {text}")));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|err| GraderError::ResponseFormatError {
                message: format!("failed to decode chat completion: {err}"),
                raw_response: text.clone(),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| GraderError::ResponseFormatError {
                message: "chat completion has no choices".to_string(),
                raw_response: text,
            })
    }
}
