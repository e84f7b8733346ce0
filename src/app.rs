// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::CommandFactory;
use console::style;
use dialoguer::{Confirm, Password, Select};
use indicatif::ProgressBar;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cli::{Cli, Commands, ConfigAction, ProviderAction};
use crate::config::{CONFIG_FILE_NAME, Config, ConfigDocument, Provider, parse_cli_value};
use crate::domain::ParsedMessage;
use crate::error::{Error, Result};
use crate::services::{
    generator::MessageGenerator,
    git::{self, ChangeSource, GitService},
    hook::{HookManager, HookStatus, InstallOutcome, UninstallOutcome},
    llm,
};

const OLLAMA_MODELS: &[(&str, &str)] = &[
    ("llama2:7b-chat", "default, ~4GB"),
    ("codellama:7b", "~4GB, better for code"),
    ("mistral:7b", "~4GB, fast"),
];

pub struct App {
    cli: Cli,
    config: Config,
    config_path: PathBuf,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let (config, config_path) = Config::load_for(&cli);
        Ok(Self {
            cli,
            config,
            config_path,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let Some(ref cmd) = self.cli.command else {
            Cli::command().print_help()?;
            return Ok(());
        };

        match cmd {
            Commands::Setup => self.run_setup().await,
            Commands::Install => self.install_hook(),
            Commands::Uninstall { force } => self.uninstall_hook(*force),
            Commands::HookStatus => self.hook_status(),
            Commands::Generate { output } => self.generate(output.as_deref()).await,
            Commands::Test => self.run_test().await,
            Commands::Config { action } => self.handle_config(action.as_ref()),
            Commands::Provider { action } => self.handle_provider(action.as_ref()).await,
            Commands::Doctor => self.run_doctor().await,
            Commands::Completions { shell } => {
                let mut cmd = Cli::command();
                clap_complete::generate(*shell, &mut cmd, "commit-ai", &mut std::io::stdout());
                Ok(())
            }
        }
    }

    // ─── Generation ───

    /// Hook entry point. Never fails on generation problems: the fallback
    /// message is written instead.
    async fn generate(&self, output: Option<&Path>) -> Result<()> {
        if !self.config.enabled {
            debug!("commit-ai is disabled in config, leaving message untouched");
            return Ok(());
        }

        let message = match self.generate_message().await {
            Ok(message) => message.full_message(),
            Err(e) => {
                warn!(error = %e, "generation failed, using fallback message");
                self.config.fallback_message.clone()
            }
        };

        match output {
            Some(path) => std::fs::write(path, format!("{message}\n"))?,
            None => println!("{message}"),
        }
        Ok(())
    }

    async fn generate_message(&self) -> Result<ParsedMessage> {
        let git = GitService::discover()?;
        let generator = MessageGenerator::new(&self.config)?;
        generator.generate(&git).await
    }

    async fn run_test(&self) -> Result<()> {
        self.print_status("Testing commit message generation...");

        let git = GitService::discover()?;
        if !git.has_staged_changes()? {
            return Err(Error::NoStagedChanges);
        }

        let files = git.staged_files()?;
        self.print_info(&format!("Files: {}", files.join(", ")));

        let generator = MessageGenerator::new(&self.config)?;
        let spinner = self.spinner(format!(
            "Generating with {} ({})...",
            generator.provider_name(),
            self.active_model()
        ));
        let result = generator.generate(&git).await;
        spinner.finish_and_clear();
        let message = result?;

        let rule = "=".repeat(60);
        println!("\n{rule}");
        println!("{}", message.full_message());
        println!("{rule}");

        if message.is_fallback() {
            self.print_warning("Provider output unavailable, fallback message used");
        }
        if !message.reasoning.is_empty() {
            println!("\n{}\n{}", style("Reasoning:").bold(), message.reasoning);
        }
        Ok(())
    }

    // ─── Setup Wizard ───

    async fn run_setup(&self) -> Result<()> {
        if !std::io::stdin().is_terminal() {
            return Err(Error::Dialog(
                "setup needs an interactive terminal".into(),
            ));
        }

        eprintln!("{}\n", style("commit-ai setup").bold());
        let git = GitService::discover().ok();
        if git.is_none() {
            self.print_warning("Not in a git repository. Setup will write config but not install the hook.");
        }

        let mut doc = ConfigDocument::load(&self.config_path);

        eprintln!("{}", style("Step 1/3: AI provider").bold());
        let items = [
            "Ollama (local, free, no API key)",
            "OpenAI GPT (requires API key)",
            "Anthropic Claude (requires API key)",
            "Google Gemini (requires API key)",
        ];
        let selection = Select::new()
            .with_prompt("Choose a provider")
            .items(&items)
            .default(0)
            .interact()?;
        let provider = Provider::ALL[selection];
        doc.set("ai_provider", Value::String(provider.as_str().into()));

        eprintln!("\n{}", style(format!("Step 2/3: Configure {provider}")).bold());
        match provider {
            Provider::Ollama => self.setup_ollama(&mut doc)?,
            other => self.setup_api_key(&mut doc, other)?,
        }

        eprintln!("\n{}", style("Step 3/3: Commit format").bold());
        let conventional = Confirm::new()
            .with_prompt("Use conventional commits (feat:, fix:, ...)?")
            .default(true)
            .interact()?;
        let include_body = Confirm::new()
            .with_prompt("Include a detailed body in commit messages?")
            .default(true)
            .interact()?;
        doc.set("commit_format.use_conventional_commits", Value::Bool(conventional));
        doc.set("commit_format.include_body", Value::Bool(include_body));

        doc.save()?;
        eprintln!(
            "\n{} Configuration saved to {}",
            style("✓").green().bold(),
            doc.path().display()
        );

        if git.is_some()
            && Confirm::new()
                .with_prompt("Install the git hook in this repository?")
                .default(true)
                .interact()?
        {
            self.install_hook()?;
        }

        eprintln!("\n{} Setup complete!", style("✓").green().bold());
        eprintln!("  Stage some changes and run {}", style("git commit").yellow());
        Ok(())
    }

    fn setup_ollama(&self, doc: &mut ConfigDocument) -> Result<()> {
        if which::which("ollama").is_err() {
            self.print_warning("Ollama not found on PATH");
            eprintln!("  Install it from {}", style("https://ollama.ai").yellow());
        }

        let items: Vec<String> = OLLAMA_MODELS
            .iter()
            .map(|(model, note)| format!("{model} ({note})"))
            .collect();
        let selection = Select::new()
            .with_prompt("Choose a model")
            .items(&items)
            .default(0)
            .interact()?;
        let model = OLLAMA_MODELS[selection].0;

        doc.set("providers.ollama.model", Value::String(model.into()));
        doc.set("providers.ollama.enabled", Value::Bool(true));

        if which::which("ollama").is_ok()
            && Confirm::new()
                .with_prompt(format!("Pull {model} now? (this may take a few minutes)"))
                .default(true)
                .interact()?
        {
            let status = std::process::Command::new("ollama")
                .args(["pull", model])
                .status();
            match status {
                Ok(s) if s.success() => eprintln!("{} Model ready", style("✓").green().bold()),
                _ => self.print_warning(&format!("Failed to pull model. Run manually: ollama pull {model}")),
            }
        }
        Ok(())
    }

    fn setup_api_key(&self, doc: &mut ConfigDocument, provider: Provider) -> Result<()> {
        let key = Password::new()
            .with_prompt(format!("{provider} API key (input hidden, empty to skip)"))
            .allow_empty_password(true)
            .interact()?;

        if key.trim().is_empty() {
            self.print_warning("No API key provided. Set it later with:");
            eprintln!(
                "  {}",
                style(format!("commit-ai config set providers.{provider}.api_key YOUR_KEY")).yellow()
            );
            if let Some(var) = provider.api_key_env() {
                eprintln!("  or export {}", style(var).yellow());
            }
            return Ok(());
        }

        doc.set(
            &format!("providers.{provider}.api_key"),
            Value::String(key.trim().into()),
        );
        doc.set(&format!("providers.{provider}.enabled"), Value::Bool(true));
        eprintln!("{} {provider} configured", style("✓").green().bold());
        Ok(())
    }

    // ─── Hook Commands ───

    fn install_hook(&self) -> Result<()> {
        let git = GitService::discover()?;
        let hooks = HookManager::new(git.hooks_dir()?);

        match hooks.install()? {
            InstallOutcome::AlreadyInstalled => {
                eprintln!(
                    "{} Hook already installed at {}",
                    style("✓").green().bold(),
                    hooks.hook_path().display()
                );
                return Ok(());
            }
            InstallOutcome::Installed { backup } => {
                if let Some(backup) = backup {
                    self.print_info(&format!("Backed up existing hook to {}", backup.display()));
                }
                eprintln!(
                    "{} Hook installed at {}",
                    style("✓").green().bold(),
                    hooks.hook_path().display()
                );
            }
        }

        let config_path = git.repo_root().join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            Config::create_default(&config_path)?;
            eprintln!(
                "{} Created config at {}",
                style("✓").green().bold(),
                config_path.display()
            );
        }

        eprintln!("  Try: {}", style("git commit").yellow());
        Ok(())
    }

    fn uninstall_hook(&self, force: bool) -> Result<()> {
        let git = GitService::discover()?;
        let hooks = HookManager::new(git.hooks_dir()?);

        match hooks.uninstall(force)? {
            UninstallOutcome::NotFound => {
                self.print_info(&format!("No hook found at {}", hooks.hook_path().display()));
            }
            UninstallOutcome::Removed { restored_backup } => {
                if restored_backup {
                    self.print_info("Restored previous hook from backup");
                }
                eprintln!(
                    "{} Hook removed from {}",
                    style("✓").green().bold(),
                    hooks.hook_path().display()
                );
            }
        }
        Ok(())
    }

    fn hook_status(&self) -> Result<()> {
        let git = GitService::discover()?;
        let hooks = HookManager::new(git.hooks_dir()?);

        match hooks.status() {
            HookStatus::Installed => eprintln!(
                "{} commit-ai hook is installed at {}",
                style("✓").green().bold(),
                hooks.hook_path().display()
            ),
            HookStatus::Foreign => self.print_info(
                "A prepare-commit-msg hook exists but was not installed by commit-ai",
            ),
            HookStatus::NotInstalled => {
                eprintln!(
                    "{} No prepare-commit-msg hook installed",
                    style("✗").red().bold()
                );
                eprintln!("  Install with: {}", style("commit-ai install").yellow());
            }
        }
        Ok(())
    }

    // ─── Config Commands ───

    fn handle_config(&self, action: Option<&ConfigAction>) -> Result<()> {
        match action {
            None | Some(ConfigAction::Show) => {
                let doc = ConfigDocument::load(&self.config_path);
                eprintln!(
                    "{} Configuration from {}\n",
                    style("info:").cyan(),
                    doc.path().display()
                );
                println!("{}", doc.to_pretty_json()?);
            }
            Some(ConfigAction::Get { key }) => {
                let doc = ConfigDocument::load(&self.config_path);
                let value = doc
                    .get(key)
                    .ok_or_else(|| Error::Config(format!("Unknown config key: {key}")))?;
                match value {
                    Value::String(s) => println!("{s}"),
                    other => println!("{}", serde_json::to_string_pretty(other)?),
                }
            }
            Some(ConfigAction::Set { key, value }) => {
                let mut doc = ConfigDocument::try_load(&self.config_path)?;
                doc.set(key, parse_cli_value(value));
                doc.to_config()?;
                doc.save()?;
                eprintln!("{} Set {key} = {value}", style("✓").green().bold());
            }
            Some(ConfigAction::Path) => println!("{}", self.config_path.display()),
            Some(ConfigAction::Init) => {
                if self.config_path.exists() {
                    self.print_info(&format!(
                        "Config already exists at {}",
                        self.config_path.display()
                    ));
                } else {
                    let path = Config::create_default(&self.config_path)?;
                    eprintln!("{} Created config: {}", style("✓").green().bold(), path.display());
                }
            }
        }
        Ok(())
    }

    // ─── Provider Commands ───

    async fn handle_provider(&self, action: Option<&ProviderAction>) -> Result<()> {
        match action {
            None | Some(ProviderAction::List) => {
                println!("Available providers:\n");
                for provider in Provider::ALL {
                    let settings = self.config.provider_settings(provider);
                    let marker = if self.config.ai_provider == provider.as_str() {
                        "✓"
                    } else {
                        " "
                    };
                    let enabled = if settings.enabled { "enabled" } else { "disabled" };
                    println!("  [{marker}] {provider} ({enabled}, model: {})", settings.model);
                }
            }
            Some(ProviderAction::Switch { name }) => {
                let provider: Provider = name.parse()?;
                let mut doc = ConfigDocument::try_load(&self.config_path)?;
                doc.set("ai_provider", Value::String(provider.as_str().into()));
                doc.save()?;
                eprintln!("{} Switched to {provider}", style("✓").green().bold());
            }
            Some(ProviderAction::Test) => {
                let generator = MessageGenerator::new(&self.config)?;
                let spinner = self.spinner(format!("Testing {}...", generator.provider_name()));
                let working = generator.test_provider().await;
                spinner.finish_and_clear();

                if !working {
                    if let Err(e) = generator.validate_provider().await {
                        self.print_warning(&e.to_string());
                    }
                    return Err(Error::ProviderUnavailable {
                        provider: generator.provider_name().to_string(),
                    });
                }
                eprintln!("{} Provider is working", style("✓").green().bold());
            }
        }
        Ok(())
    }

    // ─── Diagnostics ───

    async fn run_doctor(&self) -> Result<()> {
        eprintln!("{} Running diagnostics...\n", style("→").cyan());
        let mut issues: Vec<String> = Vec::new();

        eprintln!("{}", style("Dependencies").bold().underlined());
        match git::git_version() {
            Some(version) => eprintln!("  {} {version}", style("✓").green()),
            None => {
                eprintln!("  {} git: {}", style("✗").red(), style("NOT FOUND").red().bold());
                issues.push("Git is not installed".into());
            }
        }
        eprintln!();

        eprintln!("{}", style("AI Provider").bold().underlined());
        eprintln!("  Provider:    {}", self.config.ai_provider);
        eprintln!("  Model:       {}", self.active_model());
        match llm::create_provider(&self.config) {
            Ok(provider) => match provider.validate_config().await {
                Ok(()) => eprintln!("  Status:      {}", style("OK").green().bold()),
                Err(e) => {
                    eprintln!("  Status:      {}", style("NOT READY").red().bold());
                    eprintln!("  {e}");
                    issues.push(e.to_string());
                }
            },
            Err(e) => {
                eprintln!("  Status:      {}", style("UNKNOWN PROVIDER").red().bold());
                issues.push(e.to_string());
            }
        }
        eprintln!();

        eprintln!("{}", style("Git Hook").bold().underlined());
        match GitService::discover() {
            Ok(git) => {
                let hooks = HookManager::new(git.hooks_dir()?);
                if let Some(branch) = git.branch_name() {
                    eprintln!("  Branch:      {branch}");
                }
                match hooks.status() {
                    HookStatus::Installed => eprintln!(
                        "  {} Installed at {}",
                        style("✓").green(),
                        hooks.hook_path().display()
                    ),
                    HookStatus::Foreign => {
                        eprintln!("  {} A foreign hook is installed", style("!").yellow());
                        issues.push("prepare-commit-msg hook was not installed by commit-ai".into());
                    }
                    HookStatus::NotInstalled => {
                        eprintln!("  {} Not installed", style("✗").red());
                        issues.push("Git hook not installed".into());
                    }
                }
            }
            Err(_) => eprintln!("  Not in a git repository"),
        }
        eprintln!();

        eprintln!("{}", style("Configuration").bold().underlined());
        if self.config_path.exists() {
            eprintln!("  {} {}", style("✓").green(), self.config_path.display());
        } else {
            eprintln!("  {} No config file (using defaults)", style("!").yellow());
        }
        if !self.config.enabled {
            eprintln!("  {} Generation is disabled (enabled = false)", style("!").yellow());
        }

        if issues.is_empty() {
            eprintln!("\n{} Everything looks good!", style("✓").green().bold());
        } else {
            eprintln!("\n{}", style("Issues found:").yellow().bold());
            for issue in &issues {
                eprintln!("  • {issue}");
            }
            eprintln!("\n  Suggested fix: {}", style("commit-ai setup").yellow());
        }
        Ok(())
    }

    // ─── Output Helpers ───

    fn active_model(&self) -> &str {
        self.config
            .provider()
            .map(|p| self.config.provider_settings(p).model.as_str())
            .unwrap_or("unknown")
    }

    fn spinner(&self, msg: String) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message(msg);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    fn print_status(&self, msg: &str) {
        eprintln!("{} {}", style("→").cyan(), msg);
    }

    fn print_info(&self, msg: &str) {
        eprintln!("{} {}", style("info:").cyan(), msg);
    }

    fn print_warning(&self, msg: &str) {
        eprintln!("{} {}", style("warning:").yellow().bold(), msg);
    }
}
