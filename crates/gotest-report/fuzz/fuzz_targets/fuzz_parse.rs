// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the top-level parser
//!
//! Feeds arbitrary bytes through `parse`, covering lossy UTF-8 decoding,
//! format detection and both line parsers.

#![no_main]

use libfuzzer_sys::fuzz_target;

use gotest_report::parse;

fuzz_target!(|data: &[u8]| {
    // Parsing should never panic
    if let Ok(report) = parse(data, "fuzz") {
        let _ = report.failures();
    }
});
