// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the gotest-report command
//!
//! This module provides the command line options: input and output locations,
//! the fallback package name, output formatting and logging options.

use std::path::PathBuf;

use clap::Parser;

/// Convert `go test` output (text or JSON) into a structured JSON report
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gotest-report")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Read `go test` output from this file
    ///
    /// Defaults to reading from stdin.
    #[arg(short, long, env = "GOTEST_REPORT_INPUT")]
    pub input: Option<PathBuf>,

    /// Write the JSON report to this file
    ///
    /// Defaults to writing to stdout.
    #[arg(short, long, env = "GOTEST_REPORT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Package name to use when the output never names one
    ///
    /// `go test -v` only prints the package on its final `ok`/`FAIL` line, so
    /// truncated output needs this to attribute its tests.
    #[arg(short, long, env = "GOTEST_REPORT_PACKAGE", default_value = "")]
    pub package_name: String,

    /// Pretty-print the JSON report
    #[arg(long, default_value = "false")]
    pub pretty: bool,

    /// Exit with status 1 if any test failed
    #[arg(long, default_value = "false")]
    pub set_exit_code: bool,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with the report.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Config {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input path is given but doesn't exist or isn't a file
    /// - The output path's parent directory doesn't exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(ConfigError::InputNotFound(input.clone()));
            }
            if !input.is_file() {
                return Err(ConfigError::InputNotFile(input.clone()));
            }
        }

        if let Some(parent) = self.output.as_ref().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(ConfigError::OutputDirectoryNotFound(parent.to_path_buf()));
            }
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input file not found
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Input path is not a regular file
    #[error("Input path is not a file: {0}")]
    InputNotFile(PathBuf),

    /// Output directory does not exist
    #[error("Output directory not found: {0}")]
    OutputDirectoryNotFound(PathBuf),
}
