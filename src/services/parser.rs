// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

//! Turns raw model output into a validated commit message.
//!
//! Parsing never fails: malformed or empty output degrades to the fallback
//! message rather than an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{CommitType, DEFAULT_FALLBACK_MESSAGE, ParsedMessage};

static REASONING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<reasoning>(.*?)</reasoning>").unwrap());

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<commit_title>(.*?)</commit_title>").unwrap());

static BODY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<commit_body>(.*?)</commit_body>").unwrap());

static STRAY_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?reasoning>|</?commit_title>|</?commit_body>").unwrap()
});

static LEADING_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[:()]?\s*").unwrap());

/// `type(scope): description`; the captured type is checked against the
/// configured list separately.
static CONVENTIONAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^(:]+)(\(.+?\))?: .+").unwrap());

static SCOPED_REMAINDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(([^)]+)\)\s*:?\s*(.+)").unwrap());

/// Ordered keyword table used when a title carries no known type at all.
pub const TYPE_INFERENCE_RULES: &[(&[&str], CommitType)] = &[
    (&["add", "new", "implement", "create"], CommitType::Feat),
    (&["fix", "bug", "issue", "resolve"], CommitType::Fix),
    (&["update", "modify", "change"], CommitType::Chore),
    (
        &["refactor", "restructure", "reorganize"],
        CommitType::Refactor,
    ),
    (&["test", "spec"], CommitType::Test),
    (&["doc", "readme"], CommitType::Docs),
];

/// A way of pulling `(title, body)` out of a raw response.
type ParseStrategy = fn(&str) -> Option<(String, String)>;

/// Tried in order; the first strategy that yields a title wins.
const PARSE_STRATEGIES: &[ParseStrategy] = &[parse_tagged, parse_plain];

pub struct ResponseParser;

impl ResponseParser {
    /// Parse with the built-in fallback message.
    pub fn parse_structured_response(raw: &str) -> ParsedMessage {
        Self::parse_with_fallback(raw, DEFAULT_FALLBACK_MESSAGE)
    }

    /// Parse `raw`, using `fallback` as the title when nothing usable is found.
    pub fn parse_with_fallback(raw: &str, fallback: &str) -> ParsedMessage {
        let reasoning = extract_tag(&REASONING_REGEX, raw);

        let (title, body) = PARSE_STRATEGIES
            .iter()
            .find_map(|strategy| strategy(raw))
            .unwrap_or_else(|| (fallback.to_string(), String::new()));

        ParsedMessage::new(reasoning, clean_text(&title), clean_text(&body))
    }

    /// `^(type1|type2|…)(\(scope\))?: .+`, case-sensitive on the type.
    pub fn validate_conventional_commit(title: &str, valid_types: &[String]) -> bool {
        CONVENTIONAL_REGEX
            .captures(title)
            .and_then(|caps| caps.get(1))
            .is_some_and(|kind| valid_types.iter().any(|t| t == kind.as_str()))
    }

    /// Repair a title into `type(scope): description` form where possible.
    pub fn fix_commit_format(title: &str, valid_types: &[String]) -> String {
        let title = title.trim();

        if Self::validate_conventional_commit(title, valid_types) {
            return title.to_string();
        }

        if let Some(commit_type) = valid_types
            .iter()
            .find(|t| starts_with_ignore_case(title, t))
        {
            return reassemble_with_type(commit_type, &title[commit_type.len()..]);
        }

        let inferred = infer_commit_type(title);
        format!("{inferred}: {title}")
    }

    /// Returns `(true, title)` when it fits, else `(false, shortened)`.
    ///
    /// Shortened titles are cut at `max_length` characters, backing off to the
    /// last space only when that keeps more than 70% of the limit.
    pub fn validate_title_length(title: &str, max_length: usize) -> (bool, String) {
        if title.chars().count() <= max_length {
            return (true, title.to_string());
        }

        let cut = title
            .char_indices()
            .nth(max_length)
            .map_or(title.len(), |(idx, _)| idx);
        let mut truncated = &title[..cut];

        if let Some(last_space) = truncated.rfind(' ') {
            let kept_chars = truncated[..last_space].chars().count();
            if kept_chars as f64 > max_length as f64 * 0.7 {
                truncated = &truncated[..last_space];
            }
        }

        (false, truncated.trim().to_string())
    }
}

fn extract_tag(regex: &Regex, raw: &str) -> String {
    regex
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// `<commit_title>` / `<commit_body>` tags. Fails when the title is empty.
fn parse_tagged(raw: &str) -> Option<(String, String)> {
    let title = extract_tag(&TITLE_REGEX, raw);
    if title.is_empty() {
        return None;
    }
    Some((title, extract_tag(&BODY_REGEX, raw)))
}

/// First non-empty line is the title, the rest is the body.
fn parse_plain(raw: &str) -> Option<(String, String)> {
    let without_reasoning = REASONING_REGEX.replace_all(raw, "");
    let stripped = STRAY_TAG_REGEX.replace_all(&without_reasoning, "");

    let mut lines = stripped.lines().map(str::trim).filter(|l| !l.is_empty());
    let title = lines.next()?.to_string();
    let body = lines.collect::<Vec<_>>().join("\n");

    Some((title, body))
}

/// Collapse whitespace runs to single spaces, break the line after every
/// `". "`, then rejoin any `":\n"` as `": "`.
pub fn clean_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .replace(". ", ".\n")
        .replace(":\n", ": ")
        .trim()
        .to_string()
}

fn starts_with_ignore_case(title: &str, prefix: &str) -> bool {
    title.len() >= prefix.len()
        && title.is_char_boundary(prefix.len())
        && title[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn reassemble_with_type(commit_type: &str, remainder: &str) -> String {
    let rest = LEADING_SEPARATOR_REGEX.replace(remainder.trim(), "");

    if let Some(caps) = SCOPED_REMAINDER_REGEX.captures(&rest) {
        return format!("{commit_type}({}): {}", &caps[1], &caps[2]);
    }

    if rest.starts_with(':') {
        format!("{commit_type}{rest}")
    } else {
        format!("{commit_type}: {rest}")
    }
}

pub fn infer_commit_type(title: &str) -> CommitType {
    let lower = title.to_lowercase();
    TYPE_INFERENCE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map_or(CommitType::Chore, |(_, commit_type)| *commit_type)
}
