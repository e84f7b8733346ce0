// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;

use crate::config::{Config, Provider};
use crate::domain::{ParsedMessage, PromptPayload, StagedChanges};
use crate::error::{Error, Result};
use crate::services::parser::ResponseParser;
use crate::services::prompt::{ContextHints, PromptBuilder};

/// Timeout for a generation request to a hosted API.
pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for a connectivity probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

pub const TEMPERATURE: f32 = 0.3;
pub const MAX_TOKENS: u32 = 1000;
pub const PROBE_MAX_TOKENS: u32 = 5;
pub const PROBE_PROMPT: &str = "test";

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Cheap check that the provider can be used at all.
    async fn is_available(&self) -> bool;

    /// Round trip to the backend.
    async fn test_connection(&self) -> bool;

    /// Explain what is wrong with the provider setup, if anything.
    async fn validate_config(&self) -> Result<()>;

    /// Send the prompt and return the raw response text.
    async fn complete(&self, prompt: &PromptPayload) -> Result<String>;
}

pub fn create_provider(config: &Config) -> Result<Box<dyn LlmProvider>> {
    let provider = config.provider()?;
    let settings = config.provider_settings(provider);

    Ok(match provider {
        Provider::Ollama => Box::new(ollama::OllamaProvider::new(settings)),
        Provider::OpenAI => Box::new(openai::OpenAiProvider::new(settings)),
        Provider::Anthropic => Box::new(anthropic::AnthropicProvider::new(settings)),
        Provider::Gemini => Box::new(gemini::GeminiProvider::new(settings)),
    })
}

/// Compose, call, parse and repair. Provider failures become the configured
/// fallback message with the error text as its reasoning.
pub async fn generate_commit_message(
    provider: &dyn LlmProvider,
    changes: &StagedChanges,
    config: &Config,
    hints: Option<ContextHints>,
) -> ParsedMessage {
    let mut builder = PromptBuilder::new(config);
    if let Some(hints) = hints {
        builder = builder.with_hints(hints);
    }
    let prompt = builder.build_reasoning_prompt(&changes.diff, &changes.files);
    debug!(
        provider = provider.name(),
        prompt_chars = prompt.user.len(),
        "prompt built"
    );

    match provider.complete(&prompt).await {
        Ok(raw) => finalize_response(&raw, config),
        Err(e) => {
            warn!(provider = provider.name(), error = %e, "generation failed, using fallback message");
            ParsedMessage::fallback(config.fallback_message.clone(), format!("Error: {e}"))
        }
    }
}

/// Parse a raw response and enforce the commit format rules.
pub fn finalize_response(raw: &str, config: &Config) -> ParsedMessage {
    let format = &config.commit_format;
    let mut message = ResponseParser::parse_with_fallback(raw, &config.fallback_message);

    if format.use_conventional_commits
        && !format.types.is_empty()
        && !ResponseParser::validate_conventional_commit(&message.title, &format.types)
    {
        let fixed = ResponseParser::fix_commit_format(&message.title, &format.types);
        debug!(from = %message.title, to = %fixed, "repaired commit title format");
        message.title = fixed;
    }

    let (fits, title) = ResponseParser::validate_title_length(&message.title, format.max_title_length);
    if !fits {
        debug!(
            max = format.max_title_length,
            "title too long, truncated"
        );
        message.title = title;
    }

    message
}

pub(crate) fn call_failed(provider: &str, message: impl Into<String>) -> Error {
    Error::Provider {
        provider: provider.into(),
        message: message.into(),
    }
}

/// Map a transport error, calling out timeouts explicitly.
pub(crate) fn transport_error(provider: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        call_failed(provider, "request timed out")
    } else {
        call_failed(provider, e.to_string())
    }
}

/// Fail with the status and body of an unsuccessful response.
pub(crate) async fn ensure_success(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(call_failed(provider, format!("HTTP {status}: {body}")))
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder().build().unwrap_or_default()
}

pub(crate) fn generation_timeout(timeout_secs: Option<u64>, default: Duration) -> Duration {
    timeout_secs.map_or(default, Duration::from_secs)
}
