// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotest-report: convert `go test` output into a JSON report
//!
//! Reads `go test -v` or `go test -json` output from stdin (or `--input`) and
//! writes the parsed report as JSON to stdout (or `--output`).

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use gotest_report_cli::config::Config;
use gotest_report_cli::convert::run;

/// Exit status for usage and I/O errors, distinct from test failures
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return ExitCode::from(EXIT_ERROR);
    }

    match run(&config) {
        Ok(code) => code,
        Err(e) => {
            error!("Conversion failed: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
