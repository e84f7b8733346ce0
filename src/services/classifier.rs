// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

//! Keyword heuristics that label a staged diff with a change type and scope.
//!
//! Every classifier is an ordered rule table evaluated top to bottom; the
//! first rule that fires decides the result.

use std::collections::BTreeSet;

use crate::config::CommitFormat;
use crate::domain::ChangeType;

/// Condition half of a change-type rule.
#[derive(Debug, Clone, Copy)]
pub enum Signal {
    /// Diff text mentions any of these keywords.
    DiffMentions(&'static [&'static str]),
    /// Diff text mentions any of the first set and none of the second.
    DiffMentionsWithout(&'static [&'static str], &'static [&'static str]),
    /// Some changed path satisfies the predicate.
    AnyFile(fn(&str) -> bool),
}

impl Signal {
    /// `diff_lower` must already be lowercased.
    pub fn matches(&self, diff_lower: &str, files: &[String]) -> bool {
        match self {
            Self::DiffMentions(words) => mentions_any(diff_lower, words),
            Self::DiffMentionsWithout(words, excluded) => {
                mentions_any(diff_lower, words) && !mentions_any(diff_lower, excluded)
            }
            Self::AnyFile(predicate) => files.iter().any(|f| predicate(f)),
        }
    }
}

pub const CHANGE_TYPE_RULES: &[(Signal, ChangeType)] = &[
    (
        Signal::DiffMentions(&["fix", "bug", "issue", "error", "crash", "patch"]),
        ChangeType::Bugfix,
    ),
    (
        Signal::DiffMentionsWithout(
            &["add", "new", "implement", "feature", "introduce"],
            &["test", "spec", "jest", "pytest"],
        ),
        ChangeType::Feature,
    ),
    (Signal::AnyFile(is_documentation_file), ChangeType::Documentation),
    (Signal::AnyFile(is_test_file), ChangeType::Test),
    (
        Signal::DiffMentions(&[
            "refactor",
            "restructure",
            "reorganize",
            "cleanup",
            "simplify",
        ]),
        ChangeType::Refactor,
    ),
    (
        Signal::DiffMentions(&["performance", "optimize", "faster", "efficient"]),
        ChangeType::Performance,
    ),
    (
        Signal::DiffMentions(&["format", "style", "lint", "prettier"]),
        ChangeType::Style,
    ),
];

/// Path segments that never name a scope on their own.
const GENERIC_DIRECTORIES: &[&str] = &[".", "..", "src", "lib", "app"];

pub const SCOPE_KEYWORDS: &[(&str, &[&str])] = &[
    ("auth", &["auth", "login", "session", "token"]),
    ("api", &["api", "endpoint", "route"]),
    ("ui", &["component", "view", "page", "ui", "frontend"]),
    ("db", &["database", "model", "schema", "migration"]),
    ("test", &["test", "spec", "__tests__"]),
    ("docs", &["doc", "readme", "guide"]),
    ("config", &["config", "settings", "env"]),
];

/// Diffs with fewer `\n`-separated lines than this get a title only.
const SMALL_DIFF_LINES: usize = 5;

fn mentions_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

fn is_documentation_file(path: &str) -> bool {
    path.ends_with(".md")
        || path.ends_with(".rst")
        || path.ends_with(".txt")
        || path.to_lowercase().contains("doc")
}

fn is_test_file(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.contains("test") || lower.contains("spec")
}

pub fn detect_change_type(diff: &str, files: &[String]) -> ChangeType {
    let diff_lower = diff.to_lowercase();

    CHANGE_TYPE_RULES
        .iter()
        .find(|(signal, _)| signal.matches(&diff_lower, files))
        .map_or(ChangeType::Default, |(_, change_type)| *change_type)
}

/// First directory of `path` that is not a generic container like `src`.
fn leading_directory(path: &str) -> Option<&str> {
    let segments: Vec<&str> = path.split('/').collect();
    let (_file, dirs) = segments.split_last()?;
    dirs.iter()
        .copied()
        .find(|segment| !GENERIC_DIRECTORIES.contains(segment))
}

pub fn analyze_scope(files: &[String]) -> String {
    if files.is_empty() {
        return String::new();
    }

    let directories: BTreeSet<&str> = files.iter().filter_map(|f| leading_directory(f)).collect();

    if directories.len() == 1 {
        if let Some(dir) = directories.first() {
            return dir.replace(['_', ' '], "-");
        }
    }

    let joined = files.join(" ").to_lowercase();
    SCOPE_KEYWORDS
        .iter()
        .find(|(_, keywords)| mentions_any(&joined, keywords))
        .map(|(scope, _)| (*scope).to_string())
        .unwrap_or_default()
}

pub fn should_include_body(diff: &str, format: &CommitFormat) -> bool {
    if !format.include_body {
        return false;
    }

    // Size and file count past the threshold never take the body away
    diff.split('\n').count() >= SMALL_DIFF_LINES
}
