// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{
    GENERATE_TIMEOUT, LlmProvider, MAX_TOKENS, PROBE_PROMPT, PROBE_TIMEOUT, TEMPERATURE,
    call_failed, ensure_success, generation_timeout, http_client, transport_error,
};
use crate::config::ProviderSettings;
use crate::domain::PromptPayload;
use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";
const NAME: &str = "gemini";

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
    timeout: Duration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiProvider {
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

    /// The key travels as a query parameter.
    async fn post(
        &self,
        request: &GenerateRequest<'_>,
        timeout: Duration,
    ) -> Result<reqwest::Response> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            self.model,
            self.api_key.expose_secret()
        );

        self.client
            .post(url)
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(NAME, e.without_url()))
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
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

        let probe = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: PROBE_PROMPT }],
            }],
            generation_config: None,
        };

        self.post(&probe, PROBE_TIMEOUT)
            .await
            .is_ok_and(|response| response.status() == StatusCode::OK)
    }

    async fn validate_config(&self) -> Result<()> {
        if !self.has_key() {
            return Err(Error::Config(
                "Gemini API key is not configured. Set it with: commit-ai config set providers.gemini.api_key YOUR_KEY".into(),
            ));
        }
        Ok(())
    }

    async fn complete(&self, prompt: &PromptPayload) -> Result<String> {
        let text = format!("{}\n\n{}", prompt.system, prompt.user);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &text }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_TOKENS,
            }),
        };

        let response = ensure_success(NAME, self.post(&request, self.timeout).await?).await?;
        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| call_failed(NAME, format!("malformed response: {e}")))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| call_failed(NAME, "response contained no candidates"))
    }
}
