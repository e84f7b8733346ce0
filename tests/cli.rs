// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! End-to-end runs of the `commit-ai` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

/// The binary with a private config file and no inherited overrides.
fn commit_ai(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("commit-ai").unwrap();
    cmd.env_remove("COMMIT_AI_CONFIG")
        .env_remove("COMMIT_AI_PROVIDER")
        .env_remove("COMMIT_AI_MODEL")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

fn workspace() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("commit-ai.conf");
    (dir, config)
}

// ─── Basics ──────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("commit-ai")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("provider"));
}

#[test]
fn completions_for_bash() {
    let (_dir, config) = workspace();
    commit_ai(&config)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("commit-ai"));
}

// ─── Config commands ─────────────────────────────────────────────────────────

#[test]
fn config_path_echoes_explicit_file() {
    let (_dir, config) = workspace();
    commit_ai(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("commit-ai.conf"));
}

#[test]
fn config_set_then_get() {
    let (_dir, config) = workspace();
    commit_ai(&config)
        .args(["config", "set", "commit_format.max_title_length", "50"])
        .assert()
        .success();

    commit_ai(&config)
        .args(["config", "get", "commit_format.max_title_length"])
        .assert()
        .success()
        .stdout("50\n");

    commit_ai(&config)
        .args(["config", "set", "providers.ollama.model", "mistral:7b"])
        .assert()
        .success();

    commit_ai(&config)
        .args(["config", "get", "providers.ollama.model"])
        .assert()
        .success()
        .stdout("mistral:7b\n");
}

#[test]
fn config_set_rejects_invalid_values() {
    let (_dir, config) = workspace();
    commit_ai(&config)
        .args(["config", "set", "commit_format.max_title_length", "0"])
        .assert()
        .failure();
    assert!(!config.exists());
}

#[test]
fn config_get_unknown_key_fails() {
    let (_dir, config) = workspace();
    commit_ai(&config)
        .args(["config", "get", "no.such.key"])
        .assert()
        .failure();
}

#[test]
fn config_init_writes_defaults_once() {
    let (_dir, config) = workspace();
    commit_ai(&config).args(["config", "init"]).assert().success();
    let first = fs::read_to_string(&config).unwrap();
    assert!(first.contains("\"ai_provider\": \"ollama\""));

    fs::write(&config, "{\"ai_provider\": \"gemini\"}").unwrap();
    commit_ai(&config).args(["config", "init"]).assert().success();
    assert_eq!(
        fs::read_to_string(&config).unwrap(),
        "{\"ai_provider\": \"gemini\"}"
    );
}

// ─── Provider commands ───────────────────────────────────────────────────────

#[test]
fn provider_list_marks_active() {
    let (_dir, config) = workspace();
    commit_ai(&config)
        .args(["provider", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[✓] ollama"))
        .stdout(predicate::str::contains("[ ] openai"));
}

#[test]
fn provider_switch_persists() {
    let (_dir, config) = workspace();
    commit_ai(&config)
        .args(["provider", "switch", "Anthropic"])
        .assert()
        .success();

    commit_ai(&config)
        .args(["config", "get", "ai_provider"])
        .assert()
        .success()
        .stdout("anthropic\n");
}

#[test]
fn provider_switch_rejects_unknown_name() {
    let (_dir, config) = workspace();
    commit_ai(&config)
        .args(["provider", "switch", "bogus"])
        .assert()
        .failure();
    assert!(!config.exists());
}

// ─── Generation ──────────────────────────────────────────────────────────────

#[test]
fn generate_outside_repository_prints_fallback() {
    let (dir, config) = workspace();
    commit_ai(&config)
        .current_dir(dir.path())
        .arg("generate")
        .assert()
        .success()
        .stdout("chore: update files\n");
}

#[test]
fn generate_writes_output_file() {
    let (dir, config) = workspace();
    fs::write(&config, "{\"fallback_message\": \"chore: wip\"}").unwrap();
    let message_file = dir.path().join("COMMIT_EDITMSG");

    commit_ai(&config)
        .current_dir(dir.path())
        .arg("generate")
        .arg("--output")
        .arg(&message_file)
        .assert()
        .success()
        .stdout("");
    assert_eq!(fs::read_to_string(&message_file).unwrap(), "chore: wip\n");
}

#[test]
fn disabled_generation_leaves_message_alone() {
    let (dir, config) = workspace();
    fs::write(&config, "{\"enabled\": false}").unwrap();
    let message_file = dir.path().join("COMMIT_EDITMSG");
    fs::write(&message_file, "draft\n").unwrap();

    commit_ai(&config)
        .current_dir(dir.path())
        .arg("generate")
        .arg("--output")
        .arg(&message_file)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&message_file).unwrap(), "draft\n");
}
