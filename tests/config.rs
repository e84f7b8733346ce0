// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::fs;

use clap::Parser;
use serde_json::{Value, json};

use commit_ai::Cli;
use commit_ai::config::{
    CONFIG_FILE_NAME, Config, ConfigDocument, Provider, deep_merge, default_document, get_value,
    parse_cli_value, resolve_path, set_value,
};
use commit_ai::error::Error;

// ─── Default values ──────────────────────────────────────────────────────────

#[test]
fn default_config_values() {
    let config = Config::default();
    assert!(config.enabled);
    assert_eq!(config.ai_provider, "ollama");
    assert_eq!(config.providers.ollama.model, "llama2:7b-chat");
    assert_eq!(config.providers.ollama.base_url, "http://localhost:11434");
    assert!(config.providers.ollama.enabled);
    assert_eq!(config.providers.openai.model, "gpt-4");
    assert!(!config.providers.openai.enabled);
    assert_eq!(config.providers.anthropic.model, "claude-3-5-sonnet-20241022");
    assert_eq!(config.providers.gemini.model, "gemini-pro");
    assert_eq!(config.commit_format.max_title_length, 72);
    assert_eq!(
        config.commit_format.types,
        ["feat", "fix", "docs", "style", "refactor", "test", "chore", "perf"]
    );
    assert!(config.commit_format.include_body);
    assert!(config.commit_format.use_conventional_commits);
    assert_eq!(config.analysis.max_diff_lines, 500);
    assert!(config.analysis.include_file_list);
    assert_eq!(config.fallback_message, "chore: update files");
}

#[test]
fn default_document_has_no_api_keys() {
    let doc = default_document();
    assert!(get_value(&doc, "providers.openai.api_key").is_none());
    assert_eq!(
        get_value(&doc, "providers.ollama.model"),
        Some(&json!("llama2:7b-chat"))
    );
}

// ─── Deep merge ──────────────────────────────────────────────────────────────

#[test]
fn deep_merge_overlays_nested_keys() {
    let base = json!({"a": {"x": 1, "y": 2}, "b": true});
    let overlay = json!({"a": {"y": 3, "z": 4}});

    let merged = deep_merge(&base, &overlay);
    assert_eq!(merged, json!({"a": {"x": 1, "y": 3, "z": 4}, "b": true}));
    // Inputs are untouched
    assert_eq!(base, json!({"a": {"x": 1, "y": 2}, "b": true}));
}

#[test]
fn deep_merge_replaces_non_objects() {
    let base = json!({"types": ["feat", "fix"], "n": {"deep": 1}});
    let overlay = json!({"types": ["docs"], "n": 5});
    assert_eq!(
        deep_merge(&base, &overlay),
        json!({"types": ["docs"], "n": 5})
    );
}

// ─── Dotted keys ─────────────────────────────────────────────────────────────

#[test]
fn get_value_walks_dotted_path() {
    let doc = json!({"providers": {"ollama": {"model": "mistral:7b"}}});
    assert_eq!(
        get_value(&doc, "providers.ollama.model"),
        Some(&json!("mistral:7b"))
    );
    assert!(get_value(&doc, "providers.missing.model").is_none());
    assert!(get_value(&doc, "providers.ollama.model.deeper").is_none());
}

#[test]
fn set_value_creates_parents() {
    let doc = set_value(json!({}), "providers.openai.api_key", json!("sk-test"));
    assert_eq!(doc, json!({"providers": {"openai": {"api_key": "sk-test"}}}));
}

#[test]
fn set_value_replaces_scalar_parents() {
    let doc = set_value(json!({"analysis": 3}), "analysis.max_diff_lines", json!(10));
    assert_eq!(doc, json!({"analysis": {"max_diff_lines": 10}}));
}

#[test]
fn cli_values_parse_as_json_first() {
    assert_eq!(parse_cli_value("true"), Value::Bool(true));
    assert_eq!(parse_cli_value("72"), json!(72));
    assert_eq!(parse_cli_value("[\"feat\"]"), json!(["feat"]));
    assert_eq!(parse_cli_value("llama2:7b-chat"), json!("llama2:7b-chat"));
    assert_eq!(parse_cli_value("\"quoted\""), json!("quoted"));
}

// ─── Loading ─────────────────────────────────────────────────────────────────

#[test]
fn missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let doc = ConfigDocument::try_load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(doc.value(), &default_document());
}

#[test]
fn partial_file_is_merged_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(
        &path,
        r#"{"ai_provider": "anthropic", "commit_format": {"max_title_length": 50}}"#,
    )
    .unwrap();

    let config = Config::load(&path);
    assert_eq!(config.ai_provider, "anthropic");
    assert_eq!(config.provider().unwrap(), Provider::Anthropic);
    assert_eq!(config.commit_format.max_title_length, 50);
    assert!(config.commit_format.include_body);
    assert_eq!(config.analysis.max_diff_lines, 500);
}

#[test]
fn invalid_json_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "{ not json").unwrap();

    let err = ConfigDocument::try_load(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigLoad { .. }));
}

#[test]
fn non_object_document_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[1, 2]").unwrap();

    assert!(ConfigDocument::try_load(&path).is_err());
}

#[test]
fn broken_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "{ not json").unwrap();

    let config = Config::load(&path);
    assert_eq!(config.ai_provider, "ollama");
    assert_eq!(config.commit_format.max_title_length, 72);
}

#[test]
fn invalid_values_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, r#"{"commit_format": {"max_title_length": 0}}"#).unwrap();

    assert!(ConfigDocument::try_load(&path).unwrap().to_config().is_err());
    assert_eq!(Config::load(&path).commit_format.max_title_length, 72);
}

#[test]
fn unknown_provider_survives_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, r#"{"ai_provider": "mystery", "fallback_message": "wip"}"#).unwrap();

    let config = Config::load(&path);
    assert_eq!(config.fallback_message, "wip");
    assert!(matches!(config.provider(), Err(Error::UnknownProvider(name)) if name == "mystery"));
}

// ─── Saving ──────────────────────────────────────────────────────────────────

#[test]
fn save_preserves_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, r#"{"team_notes": {"owner": "infra"}}"#).unwrap();

    let mut doc = ConfigDocument::try_load(&path).unwrap();
    doc.set("providers.ollama.model", json!("mistral:7b"));
    doc.save().unwrap();

    let reloaded = ConfigDocument::try_load(&path).unwrap();
    assert_eq!(reloaded.get("team_notes.owner"), Some(&json!("infra")));
    assert_eq!(reloaded.get("providers.ollama.model"), Some(&json!("mistral:7b")));
}

#[test]
fn save_writes_pretty_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

    Config::create_default(&path).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("{\n  \""));
    assert!(content.ends_with("}\n"));

    let parsed: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed, default_document());
}

#[cfg(unix)]
#[test]
fn saved_config_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    Config::create_default(&path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

// ─── Location ────────────────────────────────────────────────────────────────

#[test]
fn working_directory_config_wins() {
    let cwd = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    fs::write(cwd.path().join(CONFIG_FILE_NAME), "{}").unwrap();
    fs::write(root.path().join(CONFIG_FILE_NAME), "{}").unwrap();

    assert_eq!(
        resolve_path(cwd.path(), Some(root.path())),
        cwd.path().join(CONFIG_FILE_NAME)
    );
}

#[test]
fn repo_root_config_is_second() {
    let cwd = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join(CONFIG_FILE_NAME), "{}").unwrap();

    assert_eq!(
        resolve_path(cwd.path(), Some(root.path())),
        root.path().join(CONFIG_FILE_NAME)
    );
}

// ─── Command-line overrides ──────────────────────────────────────────────────

#[test]
fn cli_flags_override_provider_and_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    let cli = Cli::parse_from([
        "commit-ai",
        "--config",
        path.to_str().unwrap(),
        "--provider",
        "OpenAI",
        "--model",
        "gpt-4o",
        "doctor",
    ]);

    let (config, loaded_from) = Config::load_for(&cli);
    assert_eq!(loaded_from, path);
    assert_eq!(config.provider().unwrap(), Provider::OpenAI);
    assert_eq!(config.providers.openai.model, "gpt-4o");
    assert_eq!(config.providers.ollama.model, "llama2:7b-chat");
}

// ─── Provider names ──────────────────────────────────────────────────────────

#[test]
fn provider_names_parse_case_insensitively() {
    assert_eq!("Gemini".parse::<Provider>().unwrap(), Provider::Gemini);
    assert_eq!("ANTHROPIC".parse::<Provider>().unwrap(), Provider::Anthropic);
    assert_eq!(Provider::OpenAI.to_string(), "openai");
    assert!(matches!(
        "bard".parse::<Provider>(),
        Err(Error::UnknownProvider(_))
    ));
}
