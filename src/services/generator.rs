// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{ParsedMessage, StagedChanges};
use crate::error::{Error, Result};
use crate::services::classifier::{analyze_scope, detect_change_type};
use crate::services::git::ChangeSource;
use crate::services::llm::{self, LlmProvider};
use crate::services::prompt::ContextHints;

pub const PROVIDER_UNAVAILABLE_REASONING: &str = "AI provider not available";

pub struct MessageGenerator {
    config: Config,
    provider: Box<dyn LlmProvider>,
}

impl MessageGenerator {
    /// Fails with `UnknownProvider` when `ai_provider` names nothing we know.
    pub fn new(config: &Config) -> Result<Self> {
        let provider = llm::create_provider(config)?;
        Ok(Self::with_provider(config.clone(), provider))
    }

    pub fn with_provider(config: Config, provider: Box<dyn LlmProvider>) -> Self {
        Self { config, provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn generate(&self, source: &dyn ChangeSource) -> Result<ParsedMessage> {
        if !source.has_staged_changes()? {
            return Err(Error::NoStagedChanges);
        }

        let changes = StagedChanges::new(source.staged_diff()?, source.staged_files()?);
        if changes.is_empty() {
            return Err(Error::NoStagedChanges);
        }

        let change_type = detect_change_type(&changes.diff, &changes.files);
        let scope = analyze_scope(&changes.files);
        info!(
            change_type = %change_type,
            scope = %scope,
            files = changes.files.len(),
            lines = changes.line_count(),
            "classified staged changes"
        );

        if !self.provider.is_available().await {
            warn!(provider = self.provider.name(), "provider not available, using fallback message");
            return Ok(ParsedMessage::fallback(
                self.config.fallback_message.clone(),
                PROVIDER_UNAVAILABLE_REASONING,
            ));
        }

        let hints = ContextHints {
            change_type,
            scope: scope.clone(),
        };
        let mut message =
            llm::generate_commit_message(self.provider.as_ref(), &changes, &self.config, Some(hints))
                .await;

        if message.is_fallback() {
            return Ok(message);
        }

        if !scope.is_empty() && !message.title.contains('(') {
            if let Some(spliced) = splice_scope(&message.title, &scope) {
                debug!(scope = %scope, "added detected scope to title");
                message.title = spliced;
            }
        }

        Ok(message)
    }

    pub async fn test_provider(&self) -> bool {
        self.provider.test_connection().await
    }

    pub async fn validate_provider(&self) -> Result<()> {
        self.provider.validate_config().await
    }
}

/// Insert `(scope)` after the type token: `feat: x` becomes `feat(scope): x`.
///
/// Returns `None` when the title has no `:`.
pub fn splice_scope(title: &str, scope: &str) -> Option<String> {
    let (kind, rest) = title.split_once(':')?;
    Some(format!("{kind}({scope}):{rest}"))
}
