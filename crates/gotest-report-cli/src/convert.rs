// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Conversion of `go test` output into a JSON report
//!
//! # Example
//!
//! ```
//! use gotest_report_cli::config::Config;
//! use gotest_report_cli::convert::convert;
//!
//! let input = "=== RUN   TestA\n--- FAIL: TestA (0.01s)\nFAIL\texample.com/a\t0.020s\n";
//! let mut output = Vec::new();
//! let summary = convert(&Config::default(), input.as_bytes(), &mut output).expect("convert");
//!
//! assert_eq!(summary.failures, 1);
//! assert!(String::from_utf8(output).unwrap().contains("example.com/a"));
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process::ExitCode;

use anyhow::Context;
use gotest_report::{Report, parse};
use tracing::{debug, info, warn};

use crate::config::Config;

/// Counts from a converted report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Number of packages
    pub packages: usize,
    /// Number of tests across all packages
    pub tests: usize,
    /// Number of failed tests
    pub failures: usize,
}

impl Summary {
    /// Summarize a report
    #[must_use]
    pub fn of(report: &Report) -> Self {
        Self {
            packages: report.packages.len(),
            tests: report.total_tests(),
            failures: report.failures(),
        }
    }

    /// Check if the process should report failure
    #[must_use]
    pub fn should_fail(&self, set_exit_code: bool) -> bool {
        set_exit_code && self.failures > 0
    }

    /// Process exit code for this summary
    #[must_use]
    pub fn exit_code(&self, set_exit_code: bool) -> ExitCode {
        if self.should_fail(set_exit_code) {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Serialize a report as JSON
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(report: &Report, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
}

/// Parse `go test` output from `reader` into a report
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed.
pub fn read_report<R: BufRead>(config: &Config, reader: R) -> anyhow::Result<Report> {
    let report = parse(reader, &config.package_name).context("Failed to parse go test output")?;
    debug!(summary = ?Summary::of(&report), "Parsed report");
    Ok(report)
}

/// Write a report as JSON to `writer`
///
/// # Errors
///
/// Returns an error if the report cannot be serialized or written.
pub fn write_report<W: Write>(
    config: &Config,
    report: &Report,
    mut writer: W,
) -> anyhow::Result<()> {
    let json = to_json(report, config.pretty).context("Failed to serialize report")?;
    writeln!(writer, "{json}").context("Failed to write report")?;
    writer.flush().context("Failed to write report")?;
    Ok(())
}

/// Parse `go test` output from `reader` and write the JSON report to `writer`
///
/// Nothing is written to `writer` if parsing fails.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, or the report
/// cannot be written.
pub fn convert<R: BufRead, W: Write>(
    config: &Config,
    reader: R,
    writer: W,
) -> anyhow::Result<Summary> {
    let report = read_report(config, reader)?;
    write_report(config, &report, writer)?;
    Ok(Summary::of(&report))
}

/// Run a conversion with the configured input and output
///
/// The output file is only created once the input has parsed, so a failed
/// run leaves an existing report untouched.
///
/// # Errors
///
/// Returns an error if a file cannot be opened or the conversion fails.
pub fn run(config: &Config) -> anyhow::Result<ExitCode> {
    let report = match &config.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input {}", path.display()))?;
            read_report(config, BufReader::new(file))?
        }
        None => read_report(config, io::stdin().lock())?,
    };

    match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output {}", path.display()))?;
            write_report(config, &report, BufWriter::new(file))?;
        }
        None => write_report(config, &report, io::stdout().lock())?,
    }

    let summary = Summary::of(&report);
    if summary.failures > 0 {
        warn!(
            failures = summary.failures,
            tests = summary.tests,
            "Report contains failed tests"
        );
    }
    info!(
        packages = summary.packages,
        tests = summary.tests,
        failures = summary.failures,
        "Report written"
    );

    Ok(summary.exit_code(config.set_exit_code))
}
