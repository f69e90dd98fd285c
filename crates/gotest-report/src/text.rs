// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Text output parsing
//!
//! This module parses the human readable output of `go test -v`:
//!
//! ```text
//! === RUN   TestAdd
//!     calc_test.go:12: adding
//! --- PASS: TestAdd (0.01s)
//! PASS
//! coverage: 80.0% of statements
//! ok      example.com/calc        0.015s
//! ```
//!
//! Package names only appear on the final `ok`/`FAIL` line, so tests are held
//! in a pending list until their package is known.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::ParseError;
use crate::parser::LineParser;
use crate::report::{
    Report, ReportBuilder, Test, TestResult, latest_test, parse_seconds, record_result,
};

static RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*=== RUN\s+(.+?)\s*$").expect("valid regex"));

static PAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*=== PAUSE\s+(.+?)\s*$").expect("valid regex"));

static CONT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*=== (?:CONT|NAME)\s+(.+?)\s*$").expect("valid regex"));

static STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*--- (PASS|FAIL|SKIP): (.+) \((\S+?)(?: seconds|s)\)\s*$").expect("valid regex")
});

static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:PASS|FAIL|SKIP)\s*$").expect("valid regex"));

static COVERAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^coverage:\s+(\d+(?:\.\d+)?)%\s+of\s+statements(?:\s+in\s+.+)?\s*$")
        .expect("valid regex")
});

static RESULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(ok|FAIL)\s+(\S+)\s+",
        r"(?:(\d+(?:\.\d+)?)s|\(cached\)|(\[\w+ failed\]))",
        r"(?:\s+coverage:\s+(?:(\d+(?:\.\d+)?)%\s+of\s+statements(?:\s+in\s+\S+)?|\[no statements\]))?",
        r"(?:\s+\[no tests to run\])?\s*$",
    ))
    .expect("valid regex")
});

static NO_TEST_FILES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\?\s+(\S+)\s+\[no test files\]\s*$").expect("valid regex"));

static BUILD_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# (\S+)(?: \[[^\]]+\])?\s*$").expect("valid regex"));

/// Check if a line is test framing (`=== RUN`, `--- PASS`, ...) rather than output
pub(crate) fn is_framing_line(line: &str) -> bool {
    RUN_RE.is_match(line)
        || PAUSE_RE.is_match(line)
        || CONT_RE.is_match(line)
        || STATUS_RE.is_match(line)
}

/// Check if a line is the `# pkg` header `go test` prints before build errors
pub(crate) fn is_build_header(line: &str) -> bool {
    BUILD_HEADER_RE.is_match(line)
}

/// Extract the coverage percentage from a coverage or package result line
pub(crate) fn coverage_from_line(line: &str) -> Option<&str> {
    COVERAGE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .or_else(|| RESULT_RE.captures(line).and_then(|caps| caps.get(5)))
        .map(|m| m.as_str())
}

/// Streaming parser for `go test -v` output
#[derive(Debug)]
pub struct TextParser {
    fallback: String,
    builder: ReportBuilder,
    /// Tests seen since the last package result line
    pending: Vec<Test>,
    pending_coverage: String,
    /// Index into `pending` of the test receiving output
    current: Option<usize>,
    /// Package whose build output is being captured
    capture: Option<String>,
    build_output: HashMap<String, Vec<String>>,
}

impl TextParser {
    /// Create a parser; `fallback` names the package if no result line is seen
    #[must_use]
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
            builder: ReportBuilder::new(),
            pending: Vec::new(),
            pending_coverage: String::new(),
            current: None,
            capture: None,
            build_output: HashMap::new(),
        }
    }

    fn finish_package(
        &mut self,
        name: &str,
        time_ms: u64,
        coverage: Option<&str>,
        failure: Option<&str>,
    ) {
        let mut tests = std::mem::take(&mut self.pending);
        if let Some(reason) = failure {
            tests.push(Test {
                name: reason.to_string(),
                result: Some(TestResult::Fail),
                output: self.build_output.remove(name).unwrap_or_default(),
                ..Default::default()
            });
        }
        let pending_coverage = std::mem::take(&mut self.pending_coverage);

        let package = self.builder.summarize(name, time_ms);
        package.tests.extend(tests);
        package.set_coverage(&pending_coverage);
        package.set_coverage(coverage.unwrap_or_default());

        debug!(package = %name, tests = package.tests.len(), "Package finished");
        self.current = None;
    }
}

impl LineParser for TextParser {
    fn ingest_line(&mut self, line: &str) -> Result<(), ParseError> {
        if let Some(caps) = RUN_RE.captures(line) {
            self.capture = None;
            self.pending.push(Test::new(&caps[1]));
            self.current = Some(self.pending.len() - 1);
        } else if PAUSE_RE.is_match(line) {
            self.capture = None;
            self.current = None;
        } else if let Some(caps) = CONT_RE.captures(line) {
            self.capture = None;
            self.current = latest_test(&self.pending, &caps[1]);
        } else if let Some(caps) = STATUS_RE.captures(line) {
            self.capture = None;
            let Some(result) = TestResult::from_keyword(&caps[1]) else {
                return Ok(());
            };
            let time_ms = parse_seconds(&caps[3])?;
            self.current = Some(record_result(&mut self.pending, &caps[2], result, time_ms));
        } else if let Some(caps) = RESULT_RE.captures(line) {
            self.capture = None;
            let time_ms = caps.get(3).map(|m| parse_seconds(m.as_str())).transpose()?;
            self.finish_package(
                &caps[2],
                time_ms.unwrap_or(0),
                caps.get(5).map(|m| m.as_str()),
                caps.get(4).map(|m| m.as_str()),
            );
        } else if let Some(caps) = NO_TEST_FILES_RE.captures(line) {
            self.capture = None;
            self.builder.summarize(&caps[1], 0);
        } else if let Some(caps) = COVERAGE_RE.captures(line) {
            self.pending_coverage = caps[1].to_string();
        } else if SUMMARY_RE.is_match(line) {
            self.capture = None;
            self.current = None;
        } else if let Some(caps) = BUILD_HEADER_RE
            .captures(line)
            .filter(|_| self.current.is_none())
        {
            debug!(package = %&caps[1], "Capturing build output");
            self.capture = Some(caps[1].to_string());
        } else if let Some(package) = &self.capture {
            self.build_output
                .entry(package.clone())
                .or_default()
                .push(line.to_string());
        } else if let Some(idx) = self.current {
            self.pending[idx].output.push(line.to_string());
        }
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Report, ParseError> {
        let mut this = *self;
        if !this.pending.is_empty() {
            debug!(
                package = %this.fallback,
                tests = this.pending.len(),
                "No package result line, using fallback package"
            );
            let package = this.builder.package_mut(&this.fallback);
            package.tests.append(&mut this.pending);
            package.set_coverage(&this.pending_coverage);
        }
        Ok(this.builder.finish())
    }
}
