// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

//! Installation of the `prepare-commit-msg` hook.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

pub const HOOK_NAME: &str = "prepare-commit-msg";
pub const HOOK_MARKER: &str = "# commit-ai hook";
pub const BACKUP_NAME: &str = "prepare-commit-msg.commit-ai-backup";

const HOOK_SCRIPT: &str = r#"#!/bin/sh
# commit-ai hook (auto-generated, do not edit)
# Writes an AI-generated message for interactive commits.

COMMIT_MSG_FILE="$1"
COMMIT_SOURCE="$2"

# Skip merges, squashes, -m/-F messages and amends
case "$COMMIT_SOURCE" in
    merge|squash|message|commit)
        exit 0
        ;;
esac

if ! command -v commit-ai >/dev/null 2>&1; then
    exit 0
fi

commit-ai generate --output "$COMMIT_MSG_FILE" 2>/dev/null || true
"#;

pub fn hook_script() -> &'static str {
    HOOK_SCRIPT
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    NotInstalled,
    Installed,
    /// A hook exists but was not written by us.
    Foreign,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { backup: Option<PathBuf> },
    AlreadyInstalled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    NotFound,
    Removed { restored_backup: bool },
}

pub struct HookManager {
    hooks_dir: PathBuf,
}

impl HookManager {
    pub fn new(hooks_dir: impl Into<PathBuf>) -> Self {
        Self {
            hooks_dir: hooks_dir.into(),
        }
    }

    pub fn hook_path(&self) -> PathBuf {
        self.hooks_dir.join(HOOK_NAME)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.hooks_dir.join(BACKUP_NAME)
    }

    pub fn status(&self) -> HookStatus {
        let path = self.hook_path();
        if !path.exists() {
            return HookStatus::NotInstalled;
        }
        if is_ours(&path) {
            HookStatus::Installed
        } else {
            HookStatus::Foreign
        }
    }

    pub fn install(&self) -> Result<InstallOutcome> {
        let hook_path = self.hook_path();
        fs::create_dir_all(&self.hooks_dir)?;

        let backup = match self.status() {
            HookStatus::Installed => return Ok(InstallOutcome::AlreadyInstalled),
            HookStatus::Foreign => {
                let backup_path = self.backup_path();
                fs::copy(&hook_path, &backup_path)?;
                debug!(backup = %backup_path.display(), "backed up existing hook");
                Some(backup_path)
            }
            HookStatus::NotInstalled => None,
        };

        // Write to a temp file first, then rename into place
        let temp_path = self.hooks_dir.join(format!(".{HOOK_NAME}.tmp"));
        fs::write(&temp_path, HOOK_SCRIPT)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&temp_path)?.permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&temp_path, perms)?;
        }

        fs::rename(&temp_path, &hook_path)?;
        debug!(path = %hook_path.display(), "hook installed");

        Ok(InstallOutcome::Installed { backup })
    }

    /// Remove our hook and restore any backup. A foreign hook is only
    /// removed with `force`.
    pub fn uninstall(&self, force: bool) -> Result<UninstallOutcome> {
        let hook_path = self.hook_path();

        match self.status() {
            HookStatus::NotInstalled => return Ok(UninstallOutcome::NotFound),
            HookStatus::Foreign if !force => {
                return Err(Error::Hook(format!(
                    "Hook at {} was not installed by commit-ai",
                    hook_path.display()
                )));
            }
            _ => {}
        }

        fs::remove_file(&hook_path)?;

        let backup_path = self.backup_path();
        let restored_backup = backup_path.exists();
        if restored_backup {
            fs::rename(&backup_path, &hook_path)?;
            debug!("restored previous hook from backup");
        }

        Ok(UninstallOutcome::Removed { restored_backup })
    }
}

fn is_ours(path: &Path) -> bool {
    fs::read_to_string(path).is_ok_and(|content| content.contains(HOOK_MARKER))
}
