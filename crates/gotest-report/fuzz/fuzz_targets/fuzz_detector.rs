// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the incremental detector
//!
//! Pushes structured sequences of lines, mixing format markers with arbitrary
//! text, to exercise backlog replay.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use gotest_report::Detector;

#[derive(Debug, Arbitrary)]
enum Line {
    Run(String),
    Status(u8, String, u16),
    Event(String),
    Raw(String),
}

fuzz_target!(|lines: Vec<Line>| {
    let mut detector = Detector::new("fuzz");
    for line in lines {
        let text = match line {
            Line::Run(name) => format!("=== RUN   {name}"),
            Line::Status(kind, name, ms) => {
                let keyword = ["PASS", "FAIL", "SKIP"][usize::from(kind % 3)];
                format!("--- {keyword}: {name} ({}.{:03}s)", ms / 1000, ms % 1000)
            }
            Line::Event(json) => json,
            Line::Raw(text) => text,
        };
        if detector.push_line(&text).is_err() {
            return;
        }
    }
    let _ = detector.finish();
});
