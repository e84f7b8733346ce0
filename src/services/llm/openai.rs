// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{
    GENERATE_TIMEOUT, LlmProvider, MAX_TOKENS, PROBE_MAX_TOKENS, PROBE_PROMPT, PROBE_TIMEOUT,
    TEMPERATURE, call_failed, ensure_success, generation_timeout, http_client, transport_error,
};
use crate::config::ProviderSettings;
use crate::domain::PromptPayload;
use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const NAME: &str = "openai";

pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(settings: &ProviderSettings) -> Self {
        let base_url = if settings.base_url.trim().is_empty() {
            DEFAULT_BASE_URL
        } else {
            settings.base_url.as_str()
        };

        Self {
            client: http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: SecretString::from(settings.api_key().unwrap_or_default().to_string()),
            timeout: generation_timeout(settings.timeout_secs, GENERATE_TIMEOUT),
        }
    }

    fn has_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    async fn post(&self, request: &ChatRequest<'_>, timeout: Duration) -> Result<reqwest::Response> {
        self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(NAME, e))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn is_available(&self) -> bool {
        self.has_key()
    }

    async fn test_connection(&self) -> bool {
        if !self.has_key() {
            return false;
        }

        let probe = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: PROBE_PROMPT,
            }],
            temperature: None,
            max_tokens: PROBE_MAX_TOKENS,
        };

        self.post(&probe, PROBE_TIMEOUT)
            .await
            .is_ok_and(|response| response.status() == StatusCode::OK)
    }

    async fn validate_config(&self) -> Result<()> {
        let key = self.api_key.expose_secret();
        if key.is_empty() {
            return Err(Error::Config(
                "OpenAI API key is not configured. Set it with: commit-ai config set providers.openai.api_key YOUR_KEY".into(),
            ));
        }
        if !key.starts_with("sk-") {
            return Err(Error::Config(
                "Invalid OpenAI API key format. Key should start with 'sk-'".into(),
            ));
        }
        Ok(())
    }

    async fn complete(&self, prompt: &PromptPayload) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &prompt.system,
                },
                Message {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: Some(TEMPERATURE),
            max_tokens: MAX_TOKENS,
        };

        let response = ensure_success(NAME, self.post(&request, self.timeout).await?).await?;
        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| call_failed(NAME, format!("malformed response: {e}")))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| call_failed(NAME, "response contained no message"))
    }
}
