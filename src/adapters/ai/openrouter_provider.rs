//! OpenRouter Provider - Implementation of AIProvider for OpenRouter's API.
//!
//! Talks to the OpenAI-compatible chat completions endpoint. When the
//! configured model is rate-limited or temporarily unavailable, the provider
//! rotates through a short list of free fallback models before giving up.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenRouterConfig::new(api_key)
//!     .with_model("meta-llama/llama-3.2-3b-instruct:free")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let provider = OpenRouterProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, MessageRole, ProviderInfo,
};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const APP_TITLE: &str = "SIDEO (CBA)";

/// Free models commonly available on OpenRouter, tried in order when the
/// primary model is temporarily limited.
fn default_free_fallback_models() -> Vec<String> {
    [
        "mistralai/mistral-small-3.1-24b-instruct:free",
        "meta-llama/llama-3.3-70b-instruct:free",
        "meta-llama/llama-3.2-3b-instruct:free",
        "google/gemma-3-12b-it:free",
        "google/gemma-3-4b-it:free",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Configuration for the OpenRouter provider.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Primary model identifier.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Fallback models tried on retryable failures.
    pub fallback_models: Vec<String>,
    /// Optional referer header recommended by OpenRouter.
    pub referer: Option<String>,
}

impl OpenRouterConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "meta-llama/llama-3.2-3b-instruct:free".to_string(),
            timeout: Duration::from_secs(30),
            fallback_models: default_free_fallback_models(),
            referer: None,
        }
    }

    /// Sets the primary model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the fallback model list.
    pub fn with_fallback_models(mut self, models: Vec<String>) -> Self {
        self.fallback_models = models;
        self
    }

    /// Sets the referer header.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Primary model followed by the deduplicated fallbacks.
    fn candidate_models(&self) -> Vec<String> {
        let mut candidates = vec![self.model.clone()];
        for m in &self.fallback_models {
            if !candidates.contains(m) {
                candidates.push(m.clone());
            }
        }
        candidates
    }
}

/// OpenRouter API provider implementation.
pub struct OpenRouterProvider {
    config: OpenRouterConfig,
    client: Client,
}

impl OpenRouterProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: OpenRouterConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn to_wire_request(&self, request: &CompletionRequest, model: &str) -> WireRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| WireMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            })
            .collect();

        WireRequest {
            model: model.to_string(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature.or(Some(0.2)),
        }
    }

    async fn send_request(&self, wire: &WireRequest) -> Result<Response, AIError> {
        let mut builder = self
            .client
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .header("X-Title", APP_TITLE);

        if let Some(referer) = &self.config.referer {
            builder = builder.header("HTTP-Referer", referer.clone());
        }

        builder.json(wire).send().await.map_err(|e| {
            if e.is_timeout() {
                AIError::Timeout {
                    timeout_secs: self.config.timeout.as_secs() as u32,
                }
            } else if e.is_connect() {
                AIError::network(format!("connection failed: {}", e))
            } else {
                AIError::network(e.to_string())
            }
        })
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(Self::parse_retry_after(&error_body))),
            400 => Err(AIError::InvalidRequest(error_body)),
            500..=599 => Err(AIError::unavailable(format!(
                "server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses a "try again in Xs" hint from the error body, defaulting to 30s.
    fn parse_retry_after(error_body: &str) -> u32 {
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(error_body) {
            if let Some(msg) = parsed
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
            {
                if let Some(idx) = msg.find("try again in ") {
                    let rest = &msg[idx + 13..];
                    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
                    if let Ok(secs) = digits.parse::<u32>() {
                        return secs;
                    }
                }
            }
        }
        30
    }

    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("failed to parse response: {}", e)))?;

        let choice = wire
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("no choices in response"))?;

        Ok(CompletionResponse {
            content: choice.message.content,
            model: wire.model,
        })
    }
}

#[async_trait]
impl AIProvider for OpenRouterProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        if request.messages.is_empty() {
            return Err(AIError::InvalidRequest("no messages in request".to_string()));
        }

        let mut last_error: Option<AIError> = None;
        for model in self.config.candidate_models() {
            let wire = self.to_wire_request(&request, &model);
            let result = match self.send_request(&wire).await {
                Ok(response) => self.parse_response(response).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() => {
                    tracing::warn!(model = %model, error = %e, "model failed, trying next candidate");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| AIError::unavailable("no candidate models configured")))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openrouter", self.config.model.clone())
    }
}

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    model: String,
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}
