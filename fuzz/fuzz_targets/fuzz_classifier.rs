// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use commit_ai::services::classifier::{analyze_scope, detect_change_type};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // First line is the diff body, the rest are file paths
    let mut lines = input.lines();
    let diff = lines.next().unwrap_or_default();
    let files: Vec<String> = lines.map(str::to_string).collect();

    let _ = detect_change_type(diff, &files);
    let scope = analyze_scope(&files);
    assert!(!scope.contains('_'));
});
