// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use commit_ai::config::{Config, Provider};
use commit_ai::domain::PromptPayload;
use commit_ai::error::{Error, Result};
use commit_ai::services::git::ChangeSource;
use commit_ai::services::llm::LlmProvider;

/// Owned list of commit types
#[allow(dead_code)]
pub fn types(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| (*t).to_string()).collect()
}

#[allow(dead_code)]
pub fn files(list: &[&str]) -> Vec<String> {
    types(list)
}

/// A diff made of exactly `n` lines
#[allow(dead_code)]
pub fn diff_with_lines(n: usize) -> String {
    (0..n)
        .map(|i| format!("+line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Config pointing `provider` at `base_url` with a test key
#[allow(dead_code)]
pub fn config_for(provider: Provider, base_url: &str, api_key: &str) -> Config {
    let mut config = Config {
        ai_provider: provider.to_string(),
        ..Config::default()
    };
    let settings = config.providers.get_mut(provider);
    settings.base_url = base_url.to_string();
    settings.api_key = api_key.to_string();
    settings.timeout_secs = Some(5);
    config
}

// ─── Fake git ────────────────────────────────────────────────────────────────

#[allow(dead_code)]
pub struct FakeSource {
    pub staged: bool,
    pub diff: String,
    pub files: Vec<String>,
}

#[allow(dead_code)]
impl FakeSource {
    pub fn staged(diff: &str, file_list: &[&str]) -> Self {
        Self {
            staged: true,
            diff: diff.to_string(),
            files: files(file_list),
        }
    }

    pub fn clean() -> Self {
        Self {
            staged: false,
            diff: String::new(),
            files: Vec::new(),
        }
    }
}

impl ChangeSource for FakeSource {
    fn has_staged_changes(&self) -> Result<bool> {
        Ok(self.staged)
    }

    fn staged_diff(&self) -> Result<String> {
        Ok(self.diff.clone())
    }

    fn staged_files(&self) -> Result<Vec<String>> {
        Ok(self.files.clone())
    }
}

// ─── Fake provider ───────────────────────────────────────────────────────────

/// Provider that replays a canned response and records the prompt it saw.
#[allow(dead_code)]
pub struct ScriptedProvider {
    pub available: bool,
    pub response: std::result::Result<String, String>,
    pub seen: Arc<Mutex<Option<PromptPayload>>>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn replying(raw: &str) -> Self {
        Self {
            available: true,
            response: Ok(raw.to_string()),
            seen: Arc::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            available: true,
            response: Err(message.to_string()),
            seen: Arc::default(),
        }
    }

    /// Handle to the last prompt this provider received
    pub fn prompts(&self) -> Arc<Mutex<Option<PromptPayload>>> {
        Arc::clone(&self.seen)
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            response: Ok(String::new()),
            seen: Arc::default(),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn test_connection(&self) -> bool {
        self.available
    }

    async fn validate_config(&self) -> Result<()> {
        Ok(())
    }

    async fn complete(&self, prompt: &PromptPayload) -> Result<String> {
        if let Ok(mut seen) = self.seen.lock() {
            *seen = Some(prompt.clone());
        }
        self.response.clone().map_err(|message| Error::Provider {
            provider: "scripted".into(),
            message,
        })
    }
}
