// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod classifier;
pub mod generator;
pub mod git;
pub mod hook;
pub mod llm;
pub mod parser;
pub mod prompt;
