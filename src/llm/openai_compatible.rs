// ABOUTME: Generic OpenAI-compatible LLM provider for cloud and local endpoints
// ABOUTME: Speaks the chat completions wire format used by OpenAI, Ollama, and vLLM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # `OpenAI`-Compatible Provider
//!
//! Implementation for any endpoint that speaks the `OpenAI` chat
//! completions API: the hosted `OpenAI` service as well as local servers
//! like Ollama (<http://localhost:11434/v1>) and vLLM
//! (<http://localhost:8000/v1>).
//!
//! Configuration comes from the application config: base URL, API key, and
//! default model. Local servers typically run without an API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::config::LlmConfig;
use crate::errors::AppError;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Request timeout; the generation layer applies its own tighter deadline
const REQUEST_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Message structure for OpenAI-compatible API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// OpenAI-compatible API response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

/// Error response structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <https://api.openai.com/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
}

impl From<&LlmConfig> for OpenAiCompatibleConfig {
    fn from(llm: &LlmConfig) -> Self {
        Self {
            base_url: llm.base_url.clone(),
            api_key: Some(llm.api_key.clone()).filter(|k| !k.is_empty()),
            default_model: llm.model.clone(),
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
///
/// Works with any endpoint that implements the `OpenAI` chat completions
/// API, including the hosted service, Ollama, and vLLM.
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Convert internal messages to `OpenAI` format
    fn convert_messages(messages: &[ChatMessage]) -> Vec<OpenAiMessage> {
        messages.iter().map(OpenAiMessage::from).collect()
    }

    /// Parse error response from API
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                401 => AppError::generation(format!(
                    "API authentication failed: {}",
                    error_response.error.message
                )),
                429 => AppError::generation(format!(
                    "API rate limit reached: {}",
                    error_response.error.message
                )),
                400 => AppError::generation(format!(
                    "API rejected the request: {}",
                    error_response.error.message
                )),
                404 => AppError::generation(format!(
                    "Model or endpoint not found: {}",
                    error_response.error.message
                )),
                _ => AppError::generation(format!(
                    "{} - {}",
                    error_type, error_response.error.message
                )),
            }
        } else {
            // Non-JSON error bodies are common with local servers.
            match status.as_u16() {
                502..=504 => AppError::generation(
                    "LLM server is not responding. Is the backend running?".to_owned(),
                ),
                _ => AppError::generation(format!(
                    "API error ({}): {}",
                    status,
                    body.chars().take(200).collect::<String>()
                )),
            }
        }
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        if self.config.base_url.contains("api.openai.com") {
            "openai"
        } else if self.config.base_url.contains(":11434") {
            "ollama"
        } else {
            "openai-compatible"
        }
    }

    fn display_name(&self) -> &'static str {
        if self.config.base_url.contains("api.openai.com") {
            "OpenAI"
        } else if self.config.base_url.contains(":11434") {
            "Ollama (Local)"
        } else {
            "OpenAI-compatible"
        }
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(
        skip(self, request),
        fields(model = %request.model.as_deref().unwrap_or(&self.config.default_model))
    )]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages: Self::convert_messages(&request.messages),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        debug!(
            "Sending chat completion request to {} with {} messages",
            self.display_name(),
            openai_request.messages.len()
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {}: {}", self.name(), e);
                if e.is_timeout() {
                    AppError::generation_timeout(format!(
                        "Request to {} timed out",
                        self.display_name()
                    ))
                } else if e.is_connect() {
                    AppError::generation(format!(
                        "Cannot connect to {}. Is the server running at {}?",
                        self.display_name(),
                        self.config.base_url
                    ))
                } else {
                    AppError::generation(format!("Failed to connect: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read API response: {}", e);
            AppError::generation(format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse API response: {} - body: {}",
                e,
                &body[..body.len().min(500)]
            );
            AppError::generation(format!("Failed to parse response: {e}"))
        })?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::generation("API returned no choices"))?;

        debug!(
            "Received response from {}: content_len={:?}, finish_reason={:?}",
            self.name(),
            choice.message.content.as_ref().map(String::len),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            model: openai_response.model,
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}
