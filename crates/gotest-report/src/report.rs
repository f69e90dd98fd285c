// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Report tree types
//!
//! A [`Report`] is an ordered list of [`Package`]s, each owning its [`Test`]s.
//! Ordering always follows the order in which packages and tests were first
//! seen in the input.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Terminal outcome of a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestResult {
    /// Test passed
    Pass,
    /// Test failed
    Fail,
    /// Test was skipped
    Skip,
}

impl TestResult {
    /// Parse a `go test` result keyword (`PASS`, `fail`, ...)
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "pass" => Some(Self::Pass),
            "fail" => Some(Self::Fail),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}

/// A single test case
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Test {
    /// Test name, including any `Parent/sub` path
    pub name: String,
    /// Duration in milliseconds
    pub time_ms: u64,
    /// Outcome; `None` while the test is still running
    pub result: Option<TestResult>,
    /// Captured output lines in emission order
    pub output: Vec<String>,
}

impl Test {
    /// Create a running test with no output
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Check if a terminal result has been recorded
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    /// Check if the test failed
    #[must_use]
    pub fn failed(&self) -> bool {
        self.result == Some(TestResult::Fail)
    }
}

/// Results of a single package
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Package {
    /// Import path of the package
    pub name: String,
    /// Duration in milliseconds
    pub time_ms: u64,
    /// Tests in first-seen order
    pub tests: Vec<Test>,
    /// Statement coverage percentage as printed (e.g. `"82.5"`), empty if unknown
    pub coverage_pct: String,
}

impl Package {
    /// Create an empty package
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Count failed tests in this package
    #[must_use]
    pub fn failures(&self) -> usize {
        self.tests.iter().filter(|t| t.failed()).count()
    }

    /// Record coverage; an empty value never clears a known one
    pub(crate) fn set_coverage(&mut self, pct: &str) {
        if !pct.is_empty() {
            self.coverage_pct = pct.to_string();
        }
    }
}

/// Parsed `go test` output
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Report {
    /// Packages in first-seen order
    pub packages: Vec<Package>,
}

impl Report {
    /// Count failed tests across all packages
    #[must_use]
    pub fn failures(&self) -> usize {
        self.packages.iter().map(Package::failures).sum()
    }

    /// Count all tests across all packages
    #[must_use]
    pub fn total_tests(&self) -> usize {
        self.packages.iter().map(|p| p.tests.len()).sum()
    }

    /// Check if the report has no packages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Look up a package by name
    #[must_use]
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }
}

// ============================================================================
// Incremental tree construction
// ============================================================================

#[derive(Debug)]
struct PackageEntry {
    package: Package,
    summarized: bool,
}

/// Builds a [`Report`] one event at a time
///
/// Packages are addressed by name and created on first use. A package whose
/// summary line never arrives gets the sum of its test times on `finish`.
#[derive(Debug, Default)]
pub(crate) struct ReportBuilder {
    entries: Vec<PackageEntry>,
    index: HashMap<String, usize>,
}

impl ReportBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Get the named package, creating it if this is its first mention
    pub(crate) fn package_mut(&mut self, name: &str) -> &mut Package {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.entries.push(PackageEntry {
                    package: Package::new(name),
                    summarized: false,
                });
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.entries[idx].package
    }

    /// Record the package summary time; the first summary wins
    pub(crate) fn summarize(&mut self, name: &str, time_ms: u64) -> &mut Package {
        self.package_mut(name);
        let entry = &mut self.entries[self.index[name]];
        if !entry.summarized {
            entry.summarized = true;
            entry.package.time_ms = time_ms;
        }
        &mut entry.package
    }

    pub(crate) fn finish(self) -> Report {
        let packages = self
            .entries
            .into_iter()
            .map(|entry| {
                let mut package = entry.package;
                if !entry.summarized {
                    package.time_ms = package
                        .tests
                        .iter()
                        .fold(0u64, |acc, t| acc.saturating_add(t.time_ms));
                }
                package
            })
            .collect();
        Report { packages }
    }
}

/// Index of the most recent test with this name
pub(crate) fn latest_test(tests: &[Test], name: &str) -> Option<usize> {
    tests.iter().rposition(|t| t.name == name)
}

/// Record a terminal result for `name`
///
/// The result goes to the most recent test of that name still running. If
/// there is none, a new test is appended, so finished results are never
/// overwritten. Returns the index of the updated test.
pub(crate) fn record_result(
    tests: &mut Vec<Test>,
    name: &str,
    result: TestResult,
    time_ms: u64,
) -> usize {
    let idx = match tests.iter().rposition(|t| t.name == name && !t.is_finished()) {
        Some(idx) => idx,
        None => {
            tests.push(Test::new(name));
            tests.len() - 1
        }
    };
    let test = &mut tests[idx];
    test.result = Some(result);
    test.time_ms = time_ms;
    idx
}

/// Convert a duration in seconds to whole milliseconds
pub(crate) fn seconds_to_ms(seconds: f64) -> Result<u64, ParseError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ParseError::InvalidDuration {
            value: seconds.to_string(),
        });
    }
    Ok((seconds * 1000.0).round() as u64)
}

/// Parse a textual seconds value such as `0.015`
pub(crate) fn parse_seconds(text: &str) -> Result<u64, ParseError> {
    let seconds: f64 = text.parse().map_err(|_| ParseError::InvalidDuration {
        value: text.to_string(),
    })?;
    seconds_to_ms(seconds).map_err(|_| ParseError::InvalidDuration {
        value: text.to_string(),
    })
}
