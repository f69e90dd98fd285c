// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! CLI tests for command line flag parsing
//!
//! These tests verify flag spellings, defaults and flag interactions of the
//! `gotest-report` command.

use std::path::PathBuf;

use clap::Parser;
use gotest_report_cli::config::Config;
use tracing::Level;

// ============================================================================
// Input / output flags
// ============================================================================

#[test]
fn test_no_flags_reads_stdin_writes_stdout() {
    let config = Config::try_parse_from(["gotest-report"]).expect("parse should succeed");
    assert!(config.input.is_none());
    assert!(config.output.is_none());
    assert_eq!(config.package_name, "");
}

#[test]
fn test_input_short_and_long() {
    let config =
        Config::try_parse_from(["gotest-report", "-i", "go.log"]).expect("parse should succeed");
    assert_eq!(config.input, Some(PathBuf::from("go.log")));

    let config = Config::try_parse_from(["gotest-report", "--input", "go.log"])
        .expect("parse should succeed");
    assert_eq!(config.input, Some(PathBuf::from("go.log")));
}

#[test]
fn test_output_short_and_long() {
    let config = Config::try_parse_from(["gotest-report", "-o", "report.json"])
        .expect("parse should succeed");
    assert_eq!(config.output, Some(PathBuf::from("report.json")));

    let config = Config::try_parse_from(["gotest-report", "--output=report.json"])
        .expect("parse should succeed");
    assert_eq!(config.output, Some(PathBuf::from("report.json")));
}

#[test]
fn test_package_name_flag() {
    let config = Config::try_parse_from(["gotest-report", "-p", "example.com/pkg"])
        .expect("parse should succeed");
    assert_eq!(config.package_name, "example.com/pkg");

    let config = Config::try_parse_from(["gotest-report", "--package-name", "example.com/pkg"])
        .expect("parse should succeed");
    assert_eq!(config.package_name, "example.com/pkg");
}

#[test]
fn test_input_requires_value() {
    let result = Config::try_parse_from(["gotest-report", "--input"]);
    assert!(result.is_err(), "--input needs a path");
}

// ============================================================================
// Output behaviour flags
// ============================================================================

#[test]
fn test_pretty_and_set_exit_code() {
    let config = Config::try_parse_from(["gotest-report", "--pretty", "--set-exit-code"])
        .expect("parse should succeed");
    assert!(config.pretty);
    assert!(config.set_exit_code);
}

#[test]
fn test_boolean_flag_value_syntax_not_supported() {
    // Boolean flags are toggled by presence only
    let result = Config::try_parse_from(["gotest-report", "--pretty=true"]);
    assert!(result.is_err(), "Boolean flags don't support =value syntax");
}

// ============================================================================
// Logging flags
// ============================================================================

#[test]
fn test_verbose_sets_debug_log_level() {
    let config = Config::try_parse_from(["gotest-report", "-v"]).expect("parse should succeed");
    assert!(config.verbose);
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_quiet_sets_warn_log_level() {
    let config = Config::try_parse_from(["gotest-report", "-q"]).expect("parse should succeed");
    assert!(config.quiet);
    assert_eq!(config.log_level(), Level::WARN);
}

#[test]
fn test_verbose_wins_over_quiet() {
    let config =
        Config::try_parse_from(["gotest-report", "-v", "-q"]).expect("parse should succeed");
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_unknown_flag_rejected() {
    let result = Config::try_parse_from(["gotest-report", "--junit"]);
    assert!(result.is_err());
}
