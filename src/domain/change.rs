// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

/// Heuristic classification of a staged diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Bugfix,
    Feature,
    Documentation,
    Test,
    Refactor,
    Performance,
    Style,
    Default,
}

impl ChangeType {
    pub const ALL: &[ChangeType] = &[
        Self::Bugfix,
        Self::Feature,
        Self::Documentation,
        Self::Test,
        Self::Refactor,
        Self::Performance,
        Self::Style,
        Self::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bugfix => "bugfix",
            Self::Feature => "feature",
            Self::Documentation => "documentation",
            Self::Test => "test",
            Self::Refactor => "refactor",
            Self::Performance => "performance",
            Self::Style => "style",
            Self::Default => "default",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staged diff text plus the paths git reported for it.
#[derive(Debug, Clone, Default)]
pub struct StagedChanges {
    pub diff: String,
    pub files: Vec<String>,
}

impl StagedChanges {
    pub fn new(diff: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            diff: diff.into(),
            files,
        }
    }

    /// Number of `\n`-separated lines, counting a trailing empty segment.
    pub fn line_count(&self) -> usize {
        self.diff.split('\n').count()
    }

    pub fn is_empty(&self) -> bool {
        self.diff.trim().is_empty()
    }
}
