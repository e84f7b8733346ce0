// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use crate::error::{Error, Result};

/// Where staged changes come from. The generator only talks to this.
pub trait ChangeSource {
    fn has_staged_changes(&self) -> Result<bool>;
    fn staged_diff(&self) -> Result<String>;
    fn staged_files(&self) -> Result<Vec<String>>;
}

pub struct GitService {
    repo: gix::Repository,
    work_dir: PathBuf,
}

impl GitService {
    pub fn discover() -> Result<Self> {
        Self::discover_at(Path::new("."))
    }

    pub fn discover_at(path: &Path) -> Result<Self> {
        let repo = gix::discover(path).map_err(|_| Error::NotARepository)?;

        let work_dir = repo
            .workdir()
            .ok_or_else(|| Error::Git("Bare repository not supported".into()))?
            .to_path_buf();

        debug!(work_dir = %work_dir.display(), "repository discovered");
        Ok(Self { repo, work_dir })
    }

    pub fn repo_root(&self) -> &Path {
        &self.work_dir
    }

    /// Short name of the checked-out branch, `None` when detached.
    pub fn branch_name(&self) -> Option<String> {
        self.repo
            .head_name()
            .ok()
            .flatten()
            .map(|name| name.shorten().to_string())
    }

    /// Hooks directory, honouring `core.hooksPath`.
    pub fn hooks_dir(&self) -> Result<PathBuf> {
        let output = self.git(&["rev-parse", "--git-path", "hooks"])?;
        let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if raw.is_empty() {
            return Ok(self.repo.git_dir().join("hooks"));
        }

        let path = PathBuf::from(raw);
        Ok(if path.is_absolute() {
            path
        } else {
            self.work_dir.join(path)
        })
    }

    fn git(&self, args: &[&str]) -> Result<Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(stderr.trim().to_string()));
        }

        Ok(output)
    }
}

impl ChangeSource for GitService {
    fn has_staged_changes(&self) -> Result<bool> {
        // --quiet exits 1 when there are differences
        let status = Command::new("git")
            .args(["diff", "--staged", "--quiet"])
            .current_dir(&self.work_dir)
            .status()?;

        match status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(Error::Git(format!(
                "git diff --staged --quiet failed with {status}"
            ))),
        }
    }

    fn staged_diff(&self) -> Result<String> {
        let output = self.git(&["diff", "--staged", "--no-ext-diff"])?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn staged_files(&self) -> Result<Vec<String>> {
        let output = self.git(&["diff", "--staged", "--name-only"])?;
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Version string reported by `git --version`, if git is installed.
pub fn git_version() -> Option<String> {
    let output = Command::new("git").arg("--version").output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}
