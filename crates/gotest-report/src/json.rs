// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! JSON event stream parsing
//!
//! This module parses the output of `go test -json`, where every line is one
//! event object emitted by `test2json`:
//!
//! ```text
//! {"Time":"2026-01-17T02:33:06Z","Action":"run","Package":"example.com/calc","Test":"TestAdd"}
//! {"Time":"2026-01-17T02:33:06Z","Action":"output","Package":"example.com/calc","Test":"TestAdd","Output":"=== RUN   TestAdd\n"}
//! {"Time":"2026-01-17T02:33:06Z","Action":"pass","Package":"example.com/calc","Test":"TestAdd","Elapsed":0.01}
//! {"Time":"2026-01-17T02:33:06Z","Action":"pass","Package":"example.com/calc","Elapsed":0.015}
//! ```

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tracing::debug;

use crate::error::ParseError;
use crate::parser::LineParser;
use crate::report::{
    Report, ReportBuilder, Test, TestResult, latest_test, record_result, seconds_to_ms,
};
use crate::text::{coverage_from_line, is_build_header, is_framing_line};

/// Name of the synthetic test recording a package build failure
pub const BUILD_FAILED_TEST: &str = "[build failed]";

// ============================================================================
// Event Types
// ============================================================================

/// Kind of a `test2json` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Package test binary is starting
    Start,
    /// Test has started running
    Run,
    /// Test has been paused
    Pause,
    /// Test has continued running
    Cont,
    /// Test or package passed
    Pass,
    /// Benchmark printed log output but did not fail
    Bench,
    /// Test or package failed
    Fail,
    /// Test or package printed output
    Output,
    /// Test or package was skipped
    Skip,
    /// Compiler output for a package build
    BuildOutput,
    /// Package build failed
    BuildFail,
    /// Any action this parser does not know about
    #[default]
    #[serde(other)]
    Unknown,
}

impl Action {
    /// The test result this action reports, if it is terminal
    #[must_use]
    pub fn result(self) -> Option<TestResult> {
        match self {
            Self::Pass => Some(TestResult::Pass),
            Self::Fail => Some(TestResult::Fail),
            Self::Skip => Some(TestResult::Skip),
            _ => None,
        }
    }
}

/// A single `test2json` event
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestEvent {
    /// When the event was emitted
    #[serde(default)]
    pub time: Option<DateTime<FixedOffset>>,
    /// What happened
    #[serde(default)]
    pub action: Action,
    /// Package import path
    #[serde(default)]
    pub package: Option<String>,
    /// Import path of a build event
    #[serde(default)]
    pub import_path: Option<String>,
    /// Test name; absent for package-level events
    #[serde(default)]
    pub test: Option<String>,
    /// Elapsed seconds, on pass/fail/skip events
    #[serde(default)]
    pub elapsed: Option<f64>,
    /// Output text, usually one line including its newline
    #[serde(default)]
    pub output: Option<String>,
    /// Import path of the build that caused a package failure
    #[serde(default)]
    pub failed_build: Option<String>,
}

/// Parse a single `test2json` event line
///
/// # Errors
///
/// Returns `ParseError::JsonParse` if the line is not a valid event object.
pub fn parse_event(json: &str) -> Result<TestEvent, ParseError> {
    serde_json::from_str(json).map_err(ParseError::from)
}

fn trim_newline(text: &str) -> &str {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.strip_suffix('\r').unwrap_or(text)
}

fn package_name<'a>(fallback: &'a str, event: &'a TestEvent) -> &'a str {
    event
        .package
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(fallback)
}

// ============================================================================
// Streaming Parser
// ============================================================================

/// Streaming parser for `go test -json` output
#[derive(Debug)]
pub struct JsonParser {
    fallback: String,
    builder: ReportBuilder,
    /// Build output lines keyed by import path
    build_output: HashMap<String, Vec<String>>,
}

impl JsonParser {
    /// Create a parser; `fallback` names events that carry no package
    #[must_use]
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
            builder: ReportBuilder::new(),
            build_output: HashMap::new(),
        }
    }

    /// Fold one event into the report
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidDuration` if `Elapsed` is negative or not finite.
    pub fn apply(&mut self, event: &TestEvent) -> Result<(), ParseError> {
        let package = package_name(&self.fallback, event);

        match (event.action, event.test.as_deref()) {
            (Action::BuildOutput, _) => {
                if let (Some(path), Some(output)) = (&event.import_path, &event.output) {
                    let line = trim_newline(output);
                    if !is_build_header(line) {
                        self.build_output
                            .entry(path.clone())
                            .or_default()
                            .push(line.to_string());
                    }
                }
            }
            // The package `fail` event that follows names the failed build
            (Action::BuildFail, _) => {}
            (Action::Unknown, _) => {
                debug!(package = %package, time = ?event.time, "Ignoring unknown event");
                self.builder.package_mut(package);
            }
            (Action::Run, Some(test)) => {
                self.builder.package_mut(package).tests.push(Test::new(test));
            }
            (Action::Output, Some(test)) => {
                let line = trim_newline(event.output.as_deref().unwrap_or_default());
                let tests = &mut self.builder.package_mut(package).tests;
                if !is_framing_line(line) {
                    let idx = latest_test(tests, test).unwrap_or_else(|| {
                        tests.push(Test::new(test));
                        tests.len() - 1
                    });
                    tests[idx].output.push(line.to_string());
                }
            }
            (Action::Output, None) => {
                let line = trim_newline(event.output.as_deref().unwrap_or_default());
                let package = self.builder.package_mut(package);
                if let Some(pct) = coverage_from_line(line) {
                    package.set_coverage(pct);
                }
            }
            (Action::Pass | Action::Fail | Action::Skip, test) => {
                let time_ms = seconds_to_ms(event.elapsed.unwrap_or(0.0))?;
                let Some(result) = event.action.result() else {
                    return Ok(());
                };
                match test {
                    Some(test) => {
                        let tests = &mut self.builder.package_mut(package).tests;
                        record_result(tests, test, result, time_ms);
                    }
                    None => {
                        let failed_build = event.failed_build.as_deref().filter(|b| !b.is_empty());
                        let summary = self.builder.summarize(package, time_ms);
                        if let Some(build) = failed_build {
                            debug!(package = %summary.name, build = %build, "Package build failed");
                            summary.tests.push(Test {
                                name: BUILD_FAILED_TEST.to_string(),
                                result: Some(TestResult::Fail),
                                output: self.build_output.remove(build).unwrap_or_default(),
                                ..Default::default()
                            });
                        }
                    }
                }
            }
            // Also `run` without a test name
            (Action::Start | Action::Run | Action::Pause | Action::Cont | Action::Bench, _) => {
                self.builder.package_mut(package);
            }
        }
        Ok(())
    }
}

impl LineParser for JsonParser {
    fn ingest_line(&mut self, line: &str) -> Result<(), ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        let event = parse_event(line)?;
        self.apply(&event)
    }

    fn finish(self: Box<Self>) -> Result<Report, ParseError> {
        Ok(self.builder.finish())
    }
}
