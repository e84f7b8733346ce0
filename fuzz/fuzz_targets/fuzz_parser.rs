// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use commit_ai::services::parser::ResponseParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    let types: Vec<String> = ["feat", "fix", "docs", "chore"]
        .iter()
        .map(|t| (*t).to_string())
        .collect();

    let message = ResponseParser::parse_structured_response(raw);
    assert!(!message.title.is_empty());

    let fixed = ResponseParser::fix_commit_format(&message.title, &types);
    let (_, truncated) = ResponseParser::validate_title_length(&fixed, 72);
    assert!(truncated.chars().count() <= 72);
});
