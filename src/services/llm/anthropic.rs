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

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const NAME: &str = "anthropic";

pub struct AnthropicProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
    timeout: Duration,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

impl AnthropicProvider {
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

    async fn post(
        &self,
        request: &MessagesRequest<'_>,
        timeout: Duration,
    ) -> Result<reqwest::Response> {
        self.client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(NAME, e))
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
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

        let probe = MessagesRequest {
            model: &self.model,
            max_tokens: PROBE_MAX_TOKENS,
            temperature: None,
            system: None,
            messages: vec![Message {
                role: "user",
                content: PROBE_PROMPT,
            }],
        };

        self.post(&probe, PROBE_TIMEOUT)
            .await
            .is_ok_and(|response| response.status() == StatusCode::OK)
    }

    async fn validate_config(&self) -> Result<()> {
        let key = self.api_key.expose_secret();
        if key.is_empty() {
            return Err(Error::Config(
                "Anthropic API key is not configured. Set it with: commit-ai config set providers.anthropic.api_key YOUR_KEY".into(),
            ));
        }
        if !key.starts_with("sk-ant-") {
            return Err(Error::Config(
                "Invalid Anthropic API key format. Key should start with 'sk-ant-'".into(),
            ));
        }
        Ok(())
    }

    async fn complete(&self, prompt: &PromptPayload) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: Some(TEMPERATURE),
            system: Some(&prompt.system),
            messages: vec![Message {
                role: "user",
                content: &prompt.user,
            }],
        };

        let response = ensure_success(NAME, self.post(&request, self.timeout).await?).await?;
        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| call_failed(NAME, format!("malformed response: {e}")))?;

        body.content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| call_failed(NAME, "response contained no text"))
    }
}
