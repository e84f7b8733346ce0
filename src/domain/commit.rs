// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

/// Fallback subject used whenever nothing better is available.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "chore: update files";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Test,
    Chore,
    Perf,
}

impl CommitType {
    /// Default vocabulary, in the order it is offered to the model.
    pub const ALL: &[&str] = &[
        "feat", "fix", "docs", "style", "refactor", "test", "chore", "perf",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Docs => "docs",
            Self::Style => "style",
            Self::Refactor => "refactor",
            Self::Test => "test",
            Self::Chore => "chore",
            Self::Perf => "perf",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "feat" => Some(Self::Feat),
            "fix" => Some(Self::Fix),
            "docs" => Some(Self::Docs),
            "style" => Some(Self::Style),
            "refactor" => Some(Self::Refactor),
            "test" => Some(Self::Test),
            "chore" => Some(Self::Chore),
            "perf" => Some(Self::Perf),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a [`ParsedMessage`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    Provider,
    Fallback,
}

/// Commit message after parsing and repair.
///
/// The full message is derived from `title` and `body` on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    pub reasoning: String,
    pub title: String,
    pub body: String,
    pub source: MessageSource,
}

impl ParsedMessage {
    pub fn new(
        reasoning: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            reasoning: reasoning.into(),
            title: title.into(),
            body: body.into(),
            source: MessageSource::Provider,
        }
    }

    pub fn fallback(message: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            reasoning: reasoning.into(),
            title: message.into(),
            body: String::new(),
            source: MessageSource::Fallback,
        }
    }

    /// `title` alone, or `title`, a blank line and `body`.
    pub fn full_message(&self) -> String {
        if self.body.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n\n{}", self.title, self.body)
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == MessageSource::Fallback
    }
}

impl std::fmt::Display for ParsedMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_message())
    }
}
