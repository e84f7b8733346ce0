// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::domain::{CommitType, DEFAULT_FALLBACK_MESSAGE, PromptExample};
use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "commit-ai.conf";

pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are an expert software engineer who writes clear, concise, and meaningful git commit messages following conventional commit standards.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    OpenAI,
    Anthropic,
    Gemini,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Self::Ollama,
        Self::OpenAI,
        Self::Anthropic,
        Self::Gemini,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }

    /// Environment variable consulted when no key is configured.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::Ollama => None,
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Gemini => Some("GEMINI_API_KEY"),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "gemini" => Ok(Self::Gemini),
            _ => Err(Error::UnknownProvider(s.to_string())),
        }
    }
}

/// Per-provider connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Executable to run instead of `ollama` (local provider only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Generation timeout override in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ProviderSettings {
    fn new(enabled: bool, model: &str, base_url: &str) -> Self {
        Self {
            enabled,
            model: model.into(),
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// The configured key, treating an empty string as absent.
    pub fn api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty()).then_some(key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_ollama")]
    pub ollama: ProviderSettings,
    #[serde(default = "default_openai")]
    pub openai: ProviderSettings,
    #[serde(default = "default_anthropic")]
    pub anthropic: ProviderSettings,
    #[serde(default = "default_gemini")]
    pub gemini: ProviderSettings,
}

fn default_ollama() -> ProviderSettings {
    ProviderSettings::new(true, "llama2:7b-chat", "http://localhost:11434")
}
fn default_openai() -> ProviderSettings {
    ProviderSettings::new(false, "gpt-4", "https://api.openai.com/v1")
}
fn default_anthropic() -> ProviderSettings {
    ProviderSettings::new(
        false,
        "claude-3-5-sonnet-20241022",
        "https://api.anthropic.com/v1",
    )
}
fn default_gemini() -> ProviderSettings {
    ProviderSettings::new(
        false,
        "gemini-pro",
        "https://generativelanguage.googleapis.com/v1",
    )
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            ollama: default_ollama(),
            openai: default_openai(),
            anthropic: default_anthropic(),
            gemini: default_gemini(),
        }
    }
}

impl ProvidersConfig {
    pub fn get(&self, provider: Provider) -> &ProviderSettings {
        match provider {
            Provider::Ollama => &self.ollama,
            Provider::OpenAI => &self.openai,
            Provider::Anthropic => &self.anthropic,
            Provider::Gemini => &self.gemini,
        }
    }

    pub fn get_mut(&mut self, provider: Provider) -> &mut ProviderSettings {
        match provider {
            Provider::Ollama => &mut self.ollama,
            Provider::OpenAI => &mut self.openai,
            Provider::Anthropic => &mut self.anthropic,
            Provider::Gemini => &mut self.gemini,
        }
    }
}

/// Commit message format configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitFormat {
    /// Validate and repair titles as conventional commits (default: true)
    #[serde(default = "default_true")]
    pub use_conventional_commits: bool,

    /// Allowed conventional commit types
    #[serde(default = "default_types")]
    pub types: Vec<String>,

    /// Maximum title length in characters (default: 72)
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,

    /// Include body in commit message (default: true)
    #[serde(default = "default_true")]
    pub include_body: bool,
}

impl Default for CommitFormat {
    fn default() -> Self {
        Self {
            use_conventional_commits: true,
            types: default_types(),
            max_title_length: default_max_title_length(),
            include_body: true,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_types() -> Vec<String> {
    CommitType::ALL.iter().map(|t| (*t).to_string()).collect()
}
fn default_max_title_length() -> usize {
    72
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Analysis {
    pub max_diff_lines: usize,
    pub include_file_list: bool,
    pub analyze_context: bool,
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            max_diff_lines: 500,
            include_file_list: true,
            analyze_context: true,
        }
    }
}

/// Prompt overrides. Empty values fall back to the built-in templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptEngineering {
    pub system_message: String,
    pub reasoning_template: String,
    pub output_format: String,
    pub examples: Vec<PromptExample>,
}

impl Default for PromptEngineering {
    fn default() -> Self {
        Self {
            system_message: DEFAULT_SYSTEM_MESSAGE.into(),
            reasoning_template: String::new(),
            output_format: String::new(),
            examples: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_ai_provider")]
    pub ai_provider: String,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub commit_format: CommitFormat,

    #[serde(default)]
    pub analysis: Analysis,

    #[serde(default)]
    pub prompt_engineering: PromptEngineering,

    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

fn default_ai_provider() -> String {
    Provider::Ollama.to_string()
}
fn default_fallback_message() -> String {
    DEFAULT_FALLBACK_MESSAGE.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            ai_provider: default_ai_provider(),
            providers: ProvidersConfig::default(),
            commit_format: CommitFormat::default(),
            analysis: Analysis::default(),
            prompt_engineering: PromptEngineering::default(),
            fallback_message: default_fallback_message(),
        }
    }
}

impl Config {
    /// Load the document at `path` and extract a typed config from it.
    ///
    /// Never fails: unreadable or invalid configuration is logged and the
    /// defaults are used instead.
    pub fn load(path: &Path) -> Self {
        match ConfigDocument::load(path).to_config() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "invalid configuration, using defaults");
                let mut config = Config::default();
                config.fill_api_keys_from_env();
                config
            }
        }
    }

    /// Load honouring `--config`, `--provider` and `--model`.
    pub fn load_for(cli: &Cli) -> (Self, PathBuf) {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| resolve_path(&current_dir(), repo_root().as_deref()));
        let mut config = Self::load(&path);
        config.apply_cli(cli);
        debug!(
            path = %path.display(),
            provider = %config.ai_provider,
            "config loaded"
        );
        (config, path)
    }

    pub fn provider(&self) -> Result<Provider> {
        self.ai_provider.parse()
    }

    pub fn provider_settings(&self, provider: Provider) -> &ProviderSettings {
        self.providers.get(provider)
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref p) = cli.provider {
            self.ai_provider = p.to_lowercase();
        }
        if let Some(ref m) = cli.model {
            if let Ok(provider) = self.provider() {
                self.providers.get_mut(provider).model = m.clone();
            }
        }
    }

    fn fill_api_keys_from_env(&mut self) {
        for provider in Provider::ALL {
            let Some(var) = provider.api_key_env() else {
                continue;
            };
            let settings = self.providers.get_mut(provider);
            if settings.api_key().is_none() {
                if let Ok(key) = std::env::var(var) {
                    settings.api_key = key;
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.commit_format.max_title_length == 0 {
            return Err(Error::Config(
                "commit_format.max_title_length must be at least 1".into(),
            ));
        }

        if self.analysis.max_diff_lines == 0 {
            return Err(Error::Config(
                "analysis.max_diff_lines must be at least 1".into(),
            ));
        }

        if self.fallback_message.trim().is_empty() {
            return Err(Error::Config("fallback_message cannot be empty".into()));
        }

        Ok(())
    }

    /// Write the default document to `path`.
    pub fn create_default(path: &Path) -> Result<PathBuf> {
        ConfigDocument::defaults_at(path).save()?;
        Ok(path.to_path_buf())
    }
}

/// Raw JSON configuration, defaults merged under the user's file.
///
/// Keys this crate does not know about survive a load/save round trip.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: PathBuf,
    value: Value,
}

impl ConfigDocument {
    pub fn defaults_at(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            value: default_document(),
        }
    }

    pub fn try_load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::defaults_at(path));
        }

        let load_error = |message: String| Error::ConfigLoad {
            path: path.to_path_buf(),
            message,
        };

        let content = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let user: Value = serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;
        if !user.is_object() {
            return Err(load_error("top level must be a JSON object".into()));
        }

        Ok(Self {
            path: path.to_path_buf(),
            value: deep_merge(&default_document(), &user),
        })
    }

    /// Like [`Self::try_load`], but falls back to the defaults with a warning.
    pub fn load(path: &Path) -> Self {
        Self::try_load(path).unwrap_or_else(|e| {
            warn!(error = %e, "failed to load config, using defaults");
            Self::defaults_at(path)
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        get_value(&self.value, key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        let document = std::mem::take(&mut self.value);
        self.value = set_value(document, key, value);
    }

    /// Typed view, with `COMMIT_AI_` environment overrides layered on top.
    pub fn to_config(&self) -> Result<Config> {
        let mut config: Config = Figment::from(Serialized::defaults(&self.value))
            .merge(Env::prefixed("COMMIT_AI_").split("__"))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.fill_api_keys_from_env();
        config.validate()?;
        Ok(config)
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.value)?)
    }

    pub fn save(&self) -> Result<()> {
        let save_error = |message: String| Error::ConfigSave {
            path: self.path.clone(),
            message,
        };

        let mut content = self
            .to_pretty_json()
            .map_err(|e| save_error(e.to_string()))?;
        content.push('\n');

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| save_error(e.to_string()))?;
        }
        fs::write(&self.path, content).map_err(|e| save_error(e.to_string()))?;

        // API keys live in here
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(|e| save_error(e.to_string()))?;
        }

        Ok(())
    }
}

/// The built-in defaults as a JSON document.
pub fn default_document() -> Value {
    serde_json::to_value(Config::default()).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Recursively overlay `overlay` onto `base`. Objects merge key by key; any
/// other value in `overlay` replaces the one in `base`.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                let next = match base_map.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (_, other) => other.clone(),
    }
}

/// Look up a dot-separated key such as `providers.ollama.model`.
pub fn get_value<'a>(document: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(document, |current, part| current.as_object()?.get(part))
}

/// Set a dot-separated key, creating (or replacing non-object) parents.
pub fn set_value(mut document: Value, key: &str, value: Value) -> Value {
    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };

    let mut current = &mut document;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        current = ensure_object(current)
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    ensure_object(current).insert(leaf.to_string(), value);

    document
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced by an object"),
    }
}

/// Interpret a command-line value: JSON when it parses, a plain string otherwise.
pub fn parse_cli_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "commit-ai").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Pick the config file: working directory, then repository root, then the
/// user config directory. Defaults to the working directory when none exists.
pub fn resolve_path(cwd: &Path, repo_root: Option<&Path>) -> PathBuf {
    let local = cwd.join(CONFIG_FILE_NAME);
    let candidates = [
        Some(local.clone()),
        repo_root.map(|root| root.join(CONFIG_FILE_NAME)),
        user_config_path(),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|path| path.exists())
        .unwrap_or(local)
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn repo_root() -> Option<PathBuf> {
    crate::services::git::GitService::discover()
        .ok()
        .map(|git| git.repo_root().to_path_buf())
}
