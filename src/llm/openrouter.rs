// ABOUTME: OpenRouter chat-completions provider for plan generation
// ABOUTME: Classifies provider failures into the unavailable/misconfigured/malformed taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # OpenRouter Provider
//!
//! Implementation of [`PlanGenerator`] against OpenRouter's OpenAI-compatible
//! chat-completions API.
//!
//! ## Configuration
//!
//! - `OPENROUTER_API_KEY` (required): API key from <https://openrouter.ai/keys>
//! - `OPENROUTER_MODEL`: model slug (default: `anthropic/claude-3.5-haiku`)
//! - `OPENROUTER_BASE_URL`: API base (default: `https://openrouter.ai/api/v1`)
//! - `OPENROUTER_TIMEOUT_SECS`: per-request timeout (default: 120)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::prompts::{build_plan_prompt, SYSTEM_PROMPT};
use super::{parse_plan_response, PlanGenerator};
use crate::errors::{AppError, AppResult};
use crate::models::{DayDescriptor, GenerationProfile, RecordInput};

/// Environment variable for the OpenRouter API key
const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Default model used for generation
const DEFAULT_MODEL: &str = "anthropic/claude-3.5-haiku";

/// Base URL for the OpenRouter API
const API_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default per-request timeout in seconds; generation latency is highly
/// variable, the UI applies its own shorter bound.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Sampling temperature for plan generation
const TEMPERATURE: f32 = 0.7;

/// Token budget large enough for 70 day descriptions
const MAX_TOKENS: u32 = 16_000;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatCompletionMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponseMessage {
    content: Option<String>,
}

// ============================================================================
// Provider
// ============================================================================

/// OpenRouter provider configuration
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// API key (required)
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Model slug
    pub model: String,
    /// Per-request timeout
    pub timeout: Duration,
}

/// OpenRouter plan-generation provider
#[derive(Debug)]
pub struct OpenRouterProvider {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterProvider {
    /// Create a provider from explicit configuration
    ///
    /// # Errors
    ///
    /// Returns `AI_SERVICE_MISCONFIGURED` when the API key is empty, or a
    /// config error if the HTTP client cannot be built.
    pub fn new(config: OpenRouterConfig) -> AppResult<Self> {
        if config.api_key.is_empty() {
            return Err(AppError::ai_misconfigured(format!(
                "{OPENROUTER_API_KEY_ENV} not configured"
            )));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    ///
    /// # Errors
    ///
    /// Returns `AI_SERVICE_MISCONFIGURED` when `OPENROUTER_API_KEY` is not set.
    pub fn from_env() -> AppResult<Self> {
        let api_key = std::env::var(OPENROUTER_API_KEY_ENV).map_err(|_| {
            AppError::ai_misconfigured(format!("{OPENROUTER_API_KEY_ENV} not configured"))
        })?;
        let base_url =
            std::env::var("OPENROUTER_BASE_URL").unwrap_or_else(|_| API_BASE_URL.to_owned());
        let model = std::env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let timeout = std::env::var("OPENROUTER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);

        Self::new(OpenRouterConfig {
            api_key,
            base_url,
            model,
            timeout,
        })
    }

    /// Classify a non-success provider status into the AI failure taxonomy
    fn classify_error_status(status: StatusCode, body: &str) -> AppError {
        let snippet: String = body.chars().take(200).collect();
        match status.as_u16() {
            // Rate limiting and unavailability are retryable later
            429 | 503 => AppError::ai_unavailable(),
            // Rejected credentials are operational, not user-fixable
            401 | 403 => {
                AppError::ai_misconfigured(format!("OpenRouter rejected credentials: {snippet}"))
            }
            _ => AppError::ai_service(format!("OpenRouter API error ({status}): {snippet}")),
        }
    }
}

#[async_trait]
impl PlanGenerator for OpenRouterProvider {
    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn generate_plan(
        &self,
        profile: &GenerationProfile,
        personal_records: &[RecordInput],
    ) -> AppResult<Vec<DayDescriptor>> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatCompletionMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_owned(),
                },
                ChatCompletionMessage {
                    role: "user",
                    content: build_plan_prompt(profile, personal_records),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!("Requesting plan generation from OpenRouter");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("HTTP-Referer", "https://athletica.app")
            .header("X-Title", "Athletica Training Plans")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach OpenRouter: {e}");
                if e.is_timeout() || e.is_connect() {
                    AppError::ai_unavailable()
                } else {
                    AppError::ai_service(format!("Failed to send request: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::ai_service(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            error!("OpenRouter API error: {status}");
            return Err(Self::classify_error_status(status, &body));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Unparseable OpenRouter envelope: {e}");
            AppError::ai_malformed(format!("Invalid AI response format: {e}"))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::ai_malformed("Invalid AI response format: no choices"))?;

        parse_plan_response(&content).inspect_err(|_| {
            // Logged with enough context to replay the parse offline.
            error!(
                content = %content.chars().take(500).collect::<String>(),
                "AI returned a malformed plan payload"
            );
        })
    }
}
