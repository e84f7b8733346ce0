// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Local models through the `ollama` command line tool.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::{LlmProvider, call_failed, generation_timeout};
use crate::config::ProviderSettings;
use crate::domain::PromptPayload;
use crate::error::Result;

const DEFAULT_COMMAND: &str = "ollama";
const NAME: &str = "ollama";

/// Local generation is slower than the hosted APIs.
const RUN_TIMEOUT: Duration = Duration::from_secs(60);
const LIST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct OllamaProvider {
    command: String,
    model: String,
    timeout: Duration,
}

impl OllamaProvider {
    pub fn new(settings: &ProviderSettings) -> Self {
        let command = settings
            .command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COMMAND);

        Self {
            command: command.to_string(),
            model: settings.model.clone(),
            timeout: generation_timeout(settings.timeout_secs, RUN_TIMEOUT),
        }
    }

    /// Output of `ollama list`, or `None` when the tool is missing or fails.
    async fn list_models(&self) -> Option<String> {
        which::which(&self.command).ok()?;

        let output = timeout(
            LIST_TIMEOUT,
            Command::new(&self.command)
                .arg("list")
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .ok()?
        .ok()?;

        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Model name without its `:tag` suffix.
    fn model_base(&self) -> &str {
        self.model.split(':').next().unwrap_or(&self.model)
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn is_available(&self) -> bool {
        self.list_models().await.is_some()
    }

    async fn test_connection(&self) -> bool {
        self.list_models()
            .await
            .is_some_and(|models| models.contains(self.model_base()))
    }

    async fn validate_config(&self) -> Result<()> {
        let Some(models) = self.list_models().await else {
            return Err(call_failed(
                NAME,
                "Ollama is not installed or not running. Install it from https://ollama.ai and start it with: ollama serve",
            ));
        };

        if !models.contains(self.model_base()) {
            return Err(call_failed(
                NAME,
                format!(
                    "Model '{}' is not available. Pull it with: ollama pull {}",
                    self.model, self.model
                ),
            ));
        }

        Ok(())
    }

    async fn complete(&self, prompt: &PromptPayload) -> Result<String> {
        let input = format!("System: {}\n\nUser: {}", prompt.system, prompt.user);
        debug!(command = %self.command, model = %self.model, "running local model");

        let mut child = Command::new(&self.command)
            .arg("run")
            .arg(&self.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| call_failed(NAME, format!("failed to start {}: {e}", self.command)))?;

        let run = async {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(input.as_bytes()).await?;
            }
            child.wait_with_output().await
        };

        let output = timeout(self.timeout, run)
            .await
            .map_err(|_| {
                call_failed(
                    NAME,
                    format!("generation timed out after {}s", self.timeout.as_secs()),
                )
            })?
            .map_err(|e| call_failed(NAME, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(call_failed(NAME, stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
