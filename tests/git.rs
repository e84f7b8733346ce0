// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

//! Git access against throwaway repositories. Skipped when `git` is missing.

use std::fs;
use std::path::Path;
use std::process::Command;

use commit_ai::error::Error;
use commit_ai::services::git::{ChangeSource, GitService, git_version};

fn git_available() -> bool {
    which::which("git").is_ok()
}

fn run_git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}

fn init_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    run_git(dir.path(), &["init", "--quiet"]);
    run_git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/trunk"]);
    dir
}

#[test]
fn outside_a_repository() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        GitService::discover_at(dir.path()),
        Err(Error::NotARepository)
    ));
}

#[test]
fn fresh_repository_has_nothing_staged() {
    if !git_available() {
        return;
    }
    let dir = init_repo();
    fs::write(dir.path().join("notes.txt"), "untracked\n").unwrap();

    let git = GitService::discover_at(dir.path()).unwrap();
    assert!(!git.has_staged_changes().unwrap());
    assert!(git.staged_files().unwrap().is_empty());
    assert_eq!(git.staged_diff().unwrap(), "");
}

#[test]
fn staged_file_shows_in_diff_and_list() {
    if !git_available() {
        return;
    }
    let dir = init_repo();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/lib.rs"), "pub fn hello() {}\n").unwrap();
    fs::write(dir.path().join("README.md"), "unstaged\n").unwrap();
    run_git(dir.path(), &["add", "src/lib.rs"]);

    let git = GitService::discover_at(dir.path()).unwrap();
    assert!(git.has_staged_changes().unwrap());
    assert_eq!(git.staged_files().unwrap(), ["src/lib.rs"]);

    let diff = git.staged_diff().unwrap();
    assert!(diff.contains("+pub fn hello() {}"));
    assert!(!diff.contains("unstaged"));
}

#[test]
fn discovers_from_subdirectory() {
    if !git_available() {
        return;
    }
    let dir = init_repo();
    let nested = dir.path().join("a/b");
    fs::create_dir_all(&nested).unwrap();

    let git = GitService::discover_at(&nested).unwrap();
    assert_eq!(
        git.repo_root().canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );
}

#[test]
fn branch_and_hooks_dir() {
    if !git_available() {
        return;
    }
    let dir = init_repo();
    let git = GitService::discover_at(dir.path()).unwrap();

    assert_eq!(git.branch_name().as_deref(), Some("trunk"));
    assert!(git.hooks_dir().unwrap().ends_with(".git/hooks"));
}

#[test]
fn version_is_reported_when_installed() {
    if !git_available() {
        return;
    }
    assert!(git_version().unwrap().starts_with("git version"));
}
