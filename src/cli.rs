// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "commit-ai")]
#[command(version)]
#[command(about = "AI-powered git commit message generator", long_about = None)]
pub struct Cli {
    /// Path to the configuration file (default: ./commit-ai.conf)
    #[arg(short, long, global = true, env = "COMMIT_AI_CONFIG")]
    pub config: Option<PathBuf>,

    /// AI provider (ollama, openai, anthropic, gemini)
    #[arg(short, long, global = true, env = "COMMIT_AI_PROVIDER")]
    pub provider: Option<String>,

    /// Model name for the selected provider
    #[arg(short, long, global = true, env = "COMMIT_AI_MODEL")]
    pub model: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Interactive setup wizard
    Setup,
    /// Install the prepare-commit-msg hook in the current repository
    Install,
    /// Remove the prepare-commit-msg hook from the current repository
    Uninstall {
        /// Remove the hook even if commit-ai did not install it
        #[arg(long)]
        force: bool,
    },
    /// Show whether the hook is installed
    HookStatus,
    /// Generate a commit message (used by the git hook)
    Generate {
        /// Write the message to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Test message generation without committing
    Test,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Manage AI providers
    Provider {
        #[command(subcommand)]
        action: Option<ProviderAction>,
    },
    /// Diagnose setup issues
    Doctor,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the merged configuration
    Show,
    /// Print a value by dotted key, e.g. providers.ollama.model
    Get { key: String },
    /// Set a value by dotted key (JSON values are parsed, anything else is a string)
    Set { key: String, value: String },
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init,
}

#[derive(clap::Subcommand, Debug)]
pub enum ProviderAction {
    /// List providers and show the active one
    List,
    /// Switch the active provider
    Switch { name: String },
    /// Test connectivity of the active provider
    Test,
}
