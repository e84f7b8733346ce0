// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Not a git repository")]
    #[diagnostic(
        code(commit_ai::git::not_repo),
        help("Run this command inside a git repository")
    )]
    NotARepository,

    #[error("No staged changes to commit")]
    #[diagnostic(
        code(commit_ai::git::no_staged),
        help("Stage files with: git add <files>")
    )]
    NoStagedChanges,

    #[error("Provider '{provider}' is not available")]
    #[diagnostic(
        code(commit_ai::provider::unavailable),
        help("Run `commit-ai doctor` to diagnose the provider setup")
    )]
    ProviderUnavailable { provider: String },

    #[error("Provider '{provider}' error: {message}")]
    #[diagnostic(code(commit_ai::provider::error))]
    Provider { provider: String, message: String },

    #[error("Unknown provider: {0}")]
    #[diagnostic(
        code(commit_ai::provider::unknown),
        help("Supported providers: ollama, openai, anthropic, gemini")
    )]
    UnknownProvider(String),

    #[error("Failed to load config from {}: {message}", path.display())]
    #[diagnostic(code(commit_ai::config::load))]
    ConfigLoad { path: PathBuf, message: String },

    #[error("Failed to save config to {}: {message}", path.display())]
    #[diagnostic(
        code(commit_ai::config::save),
        help("Check that the directory exists and is writable")
    )]
    ConfigSave { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(commit_ai::config::error))]
    Config(String),

    #[error("Git error: {0}")]
    #[diagnostic(code(commit_ai::git::error))]
    Git(String),

    #[error("Hook error: {0}")]
    #[diagnostic(
        code(commit_ai::hook::error),
        help("Use --force to remove a hook that was not installed by commit-ai")
    )]
    Hook(String),

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Dialog(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
