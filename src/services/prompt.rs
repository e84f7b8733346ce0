// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::borrow::Cow;

use crate::config::{Config, DEFAULT_SYSTEM_MESSAGE};
use crate::domain::{ChangeType, PromptExample, PromptPayload};

/// Most few-shot examples ever placed in a prompt.
pub const MAX_PROMPT_EXAMPLES: usize = 5;

pub const DEFAULT_REASONING_TEMPLATE: &str = r#"You will analyze git changes and generate a commit message. Follow these steps:

1. ANALYZE: Review the git diff to understand what changed
2. CATEGORIZE: Determine the type of change (feat, fix, refactor, docs, style, test, chore, perf)
3. IDENTIFY SCOPE: What component/module is affected (optional but helpful)
4. SUMMARIZE: Write a concise title describing the main change
5. ELABORATE: Explain the 'what' and 'why' in the body
6. FORMAT: Structure as conventional commit

Git Changes:
{diff}

Files Modified:
{files}

Now follow the steps above and generate the commit message."#;

pub const DEFAULT_OUTPUT_FORMAT: &str = r#"Provide your response in this exact format:

<reasoning>
[Your step-by-step analysis following the 6 steps above]
</reasoning>

<commit_title>
[type](scope): [concise description in imperative mood]
</commit_title>

<commit_body>
[Detailed explanation of what changed and why]
[Include bullet points if multiple changes]
[Mention breaking changes if any]
</commit_body>"#;

pub fn default_examples() -> Vec<PromptExample> {
    vec![
        PromptExample {
            diff: "Added JWT validation middleware in auth.py".into(),
            reasoning: "1. ANALYZE: New middleware added\n2. CATEGORIZE: New feature (feat)\n3. IDENTIFY SCOPE: auth\n4. SUMMARIZE: add authentication middleware\n5. ELABORATE: Implements JWT validation\n6. FORMAT: feat(auth): add JWT validation middleware".into(),
            output: "feat(auth): add JWT validation middleware\n\nImplements JWT-based authentication middleware to validate user tokens on protected routes. Includes error handling for expired and invalid tokens.".into(),
        },
        PromptExample {
            diff: "Fixed null pointer exception in user service".into(),
            reasoning: "1. ANALYZE: Bug fix in user service\n2. CATEGORIZE: Bug fix\n3. IDENTIFY SCOPE: user service\n4. SUMMARIZE: fix null pointer exception\n5. ELABORATE: Added null check before accessing user object\n6. FORMAT: fix(user): prevent null pointer exception".into(),
            output: "fix(user): prevent null pointer exception in user service\n\nAdds null check before accessing user object properties to prevent crashes when user is not found.".into(),
        },
    ]
}

/// Classifier output offered to the model as a hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextHints {
    pub change_type: ChangeType,
    pub scope: String,
}

pub struct PromptBuilder<'a> {
    config: &'a Config,
    hints: Option<ContextHints>,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            hints: None,
        }
    }

    /// Attach classifier hints. Ignored unless `analysis.analyze_context` is set.
    pub fn with_hints(mut self, hints: ContextHints) -> Self {
        if self.config.analysis.analyze_context {
            self.hints = Some(hints);
        }
        self
    }

    pub fn build_reasoning_prompt(&self, diff: &str, files: &[String]) -> PromptPayload {
        let prompt = &self.config.prompt_engineering;
        let format = &self.config.commit_format;

        let system = non_empty_or(&prompt.system_message, DEFAULT_SYSTEM_MESSAGE);
        let reasoning_template = non_empty_or(&prompt.reasoning_template, DEFAULT_REASONING_TEMPLATE);
        let output_format = non_empty_or(&prompt.output_format, DEFAULT_OUTPUT_FORMAT);
        let examples = self.format_examples();

        let types = if format.types.is_empty() {
            crate::domain::CommitType::ALL.join(", ")
        } else {
            format.types.join(", ")
        };

        let diff = truncate_diff(diff, self.config.analysis.max_diff_lines);
        let file_list = if self.config.analysis.include_file_list {
            format_file_list(files)
        } else {
            String::new()
        };

        let reasoning = reasoning_template
            .replace("{diff}", &diff)
            .replace("{files}", &file_list);

        let mut user = format!("{reasoning}\n\n{output_format}\n\n{examples}\n\n");
        if let Some(ref hints) = self.hints {
            user.push_str(&format_hints(hints));
        }
        user.push_str(&format!(
            "Remember:\n\
             - Title max {max_title} characters\n\
             - Use conventional commit types: {types}\n\
             - Be specific about what changed and why\n\
             - Follow the reasoning steps explicitly\n\
             - Use imperative mood in title (e.g., \"add\" not \"added\")\n",
            max_title = format.max_title_length,
        ));

        PromptPayload {
            system: system.to_string(),
            user,
        }
    }

    fn format_examples(&self) -> String {
        let configured = &self.config.prompt_engineering.examples;
        let examples = if configured.is_empty() {
            Cow::Owned(default_examples())
        } else {
            Cow::Borrowed(configured)
        };

        let mut formatted = vec!["Examples of good commit messages:".to_string()];
        for (i, ex) in examples.iter().take(MAX_PROMPT_EXAMPLES).enumerate() {
            formatted.push(format!(
                "\nExample {}:\nChanges: {}\nReasoning: {}\nOutput: {}\n",
                i + 1,
                ex.diff,
                ex.reasoning,
                ex.output
            ));
        }
        formatted.join("\n")
    }
}

fn non_empty_or<'a>(value: &'a str, default: &'static str) -> &'a str {
    if value.trim().is_empty() { default } else { value }
}

/// Keep the first `max_lines` lines, noting the cut.
pub fn truncate_diff(diff: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = diff.split('\n').collect();
    if lines.len() <= max_lines {
        return diff.to_string();
    }

    let mut truncated = lines[..max_lines].join("\n");
    truncated.push_str(&format!(
        "\n... (truncated, showing first {max_lines} lines)"
    ));
    truncated
}

pub fn format_file_list(files: &[String]) -> String {
    files
        .iter()
        .map(|f| format!("  - {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_hints(hints: &ContextHints) -> String {
    let mut block = format!(
        "Detected context (heuristic, verify against the diff):\n- Change type: {}\n",
        hints.change_type
    );
    if !hints.scope.is_empty() {
        block.push_str(&format!("- Likely scope: {}\n", hints.scope));
    }
    block.push('\n');
    block
}
