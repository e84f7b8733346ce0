// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Fully composed prompt handed to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub system: String,
    pub user: String,
}

/// Few-shot example shown to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptExample {
    #[serde(default = "not_available")]
    pub diff: String,
    #[serde(default = "not_available")]
    pub reasoning: String,
    #[serde(default = "not_available")]
    pub output: String,
}

fn not_available() -> String {
    "N/A".into()
}
