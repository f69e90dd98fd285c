// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Integration tests for gotest-report
//!
//! These tests parse recorded `go test` output in both encodings and check
//! that detection, backlog replay and both parsers agree.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use gotest_report::{
    Detector, Format, JsonParser, LineParser, ParseError, Report, TestResult, TextParser, parse,
    parse_str,
};
use similar_asserts::assert_eq;

/// Get the fixtures directory for test data
fn fixtures_dir() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    Path::new(&manifest_dir).join("tests/fixtures")
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {name}: {e}"))
}

fn feed(mut parser: Box<dyn LineParser>, lines: &[&str]) -> Report {
    for line in lines {
        parser.ingest_line(line).expect("line should be accepted");
    }
    parser.finish().expect("finish should succeed")
}

#[test]
fn test_parse_verbose_fixture() {
    let report = parse_str(&read_fixture("go-test-verbose.txt"), "").expect("Should parse");

    let names: Vec<_> = report.packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "example.com/calc",
            "example.com/calc/parse",
            "example.com/calc/cmd"
        ]
    );

    let calc = &report.packages[0];
    assert_eq!(calc.time_ms, 35);
    assert_eq!(calc.coverage_pct, "71.4");
    let tests: Vec<_> = calc
        .tests
        .iter()
        .map(|t| (t.name.as_str(), t.result))
        .collect();
    assert_eq!(
        tests,
        vec![
            ("TestAdd", Some(TestResult::Pass)),
            ("TestDiv", Some(TestResult::Fail)),
            ("TestDiv/by_zero", Some(TestResult::Fail)),
            ("TestDiv/by_one", Some(TestResult::Pass)),
            ("TestSlow", Some(TestResult::Skip)),
        ]
    );
    assert_eq!(
        calc.tests[2].output,
        vec!["    calc_test.go:25: expected error, got nil".to_string()]
    );

    let parse_pkg = &report.packages[1];
    assert_eq!(parse_pkg.coverage_pct, "90.0");
    assert_eq!(parse_pkg.time_ms, 12);

    assert!(report.packages[2].tests.is_empty());
    assert_eq!(report.failures(), 2);
    assert_eq!(report.total_tests(), 6);
}

#[test]
fn test_json_and_text_reports_are_equivalent() {
    let text = parse_str(&read_fixture("go-test-verbose.txt"), "").expect("text should parse");
    let json = parse_str(&read_fixture("go-test-json.jsonl"), "").expect("json should parse");
    assert_eq!(text, json);
}

#[test]
fn test_parse_from_file_reader() {
    let file = File::open(fixtures_dir().join("go-test-json.jsonl")).expect("open fixture");
    let report = parse(BufReader::new(file), "").expect("Should parse");
    assert_eq!(report.packages.len(), 3);
    assert_eq!(report.failures(), 2);
}

#[test]
fn test_detector_picks_format_from_fixtures() {
    for (fixture, format) in [
        ("go-test-verbose.txt", Format::FreeText),
        ("go-test-json.jsonl", Format::StructuredEvent),
    ] {
        let mut detector = Detector::new("");
        for line in read_fixture(fixture).lines() {
            detector.push_line(line).expect("line should be accepted");
        }
        assert_eq!(detector.format(), Some(format), "{fixture}");
    }
}

#[test]
fn test_backlog_replay_matches_direct_text_parsing() {
    let lines = [
        "go: downloading example.com/dep v1.0.0",
        "",
        "=== RUN   TestFoo",
        "hello",
        "--- PASS: TestFoo (0.25s)",
        "ok  \texample.com/foo\t0.300s",
    ];

    let mut detector = Detector::new("");
    for line in &lines {
        detector.push_line(line).expect("line should be accepted");
    }
    let detected = detector.finish().expect("Should parse");

    let direct = feed(Box::new(TextParser::new("")), &lines);
    assert_eq!(detected, direct);
}

#[test]
fn test_backlog_replay_matches_direct_json_parsing() {
    let lines = [
        "",
        "",
        r#"{"Action":"run","Package":"p","Test":"TestFoo"}"#,
        r#"{"Action":"output","Package":"p","Test":"TestFoo","Output":"hello\n"}"#,
        r#"{"Action":"pass","Package":"p","Test":"TestFoo","Elapsed":0.25}"#,
    ];

    let mut detector = Detector::new("");
    for line in &lines {
        detector.push_line(line).expect("line should be accepted");
    }
    assert_eq!(detector.format(), Some(Format::StructuredEvent));
    let detected = detector.finish().expect("Should parse");

    let direct = feed(Box::new(JsonParser::new("")), &lines);
    assert_eq!(detected, direct);
}

#[test]
fn test_single_passing_test_with_output() {
    let input = concat!(
        r#"{"Action":"start","Package":"example.com/foo"}"#,
        "\n",
        r#"{"Action":"run","Package":"example.com/foo","Test":"Foo"}"#,
        "\n",
        r#"{"Action":"output","Package":"example.com/foo","Test":"Foo","Output":"hello\n"}"#,
        "\n",
        r#"{"Action":"pass","Package":"example.com/foo","Test":"Foo","Elapsed":1.5}"#,
        "\n",
    );
    let report = parse_str(input, "").expect("Should parse");

    let test = &report.packages[0].tests[0];
    assert_eq!(test.name, "Foo");
    assert_eq!(test.time_ms, 1500);
    assert_eq!(test.result, Some(TestResult::Pass));
    assert_eq!(test.output, vec!["hello".to_string()]);
}

#[test]
fn test_empty_input_yields_empty_report() {
    let report = parse_str("", "anything").expect("Should parse");
    assert!(report.is_empty());
    assert_eq!(report.failures(), 0);
}

#[test]
fn test_malformed_record_after_detection_is_error() {
    let input = "{\"Action\":\"run\",\"Package\":\"p\",\"Test\":\"TestA\"}\n{\"Action\":\n";
    let err = parse_str(input, "").expect_err("Should fail");
    assert_eq!(err.line(), Some(2));
    assert!(matches!(err.into_inner(), ParseError::JsonParse(_)));
}

#[test]
fn test_fallback_package_name_for_text() {
    let report = parse_str("=== RUN   TestA\n--- PASS: TestA (0.00s)\n", "pkgA")
        .expect("Should parse");
    assert_eq!(report.packages.len(), 1);
    assert_eq!(report.packages[0].name, "pkgA");
}

#[test]
fn test_fallback_package_name_for_json() {
    let report = parse_str("{\"Action\":\"run\",\"Test\":\"TestA\"}\n", "pkgA")
        .expect("Should parse");
    assert_eq!(report.packages.len(), 1);
    assert_eq!(report.packages[0].name, "pkgA");
}

#[test]
fn test_empty_fallback_gives_empty_package_name() {
    let report = parse_str("=== RUN   TestA\n", "").expect("Should parse");
    assert_eq!(report.packages[0].name, "");
    assert_eq!(report.packages[0].tests[0].result, None);
}

#[test]
fn test_fail_result_for_unstarted_test_creates_it() {
    for input in [
        "--- FAIL: TestGhost (0.00s)\n",
        "{\"Action\":\"fail\",\"Test\":\"TestGhost\"}\n",
    ] {
        let report = parse_str(input, "pkg").expect("Should parse");
        let tests = &report.packages[0].tests;
        assert_eq!(tests.len(), 1, "{input}");
        assert_eq!(tests[0].name, "TestGhost");
        assert_eq!(tests[0].result, Some(TestResult::Fail));
    }
}

#[test]
fn test_finish_is_deterministic() {
    let input = read_fixture("go-test-verbose.txt");
    let lines: Vec<&str> = input.lines().collect();
    let first = feed(Box::new(TextParser::new("")), &lines);
    let second = feed(Box::new(TextParser::new("")), &lines);
    assert_eq!(first, second);
}

#[test]
fn test_report_json_serialization() {
    let report = parse_str(&read_fixture("go-test-verbose.txt"), "").expect("Should parse");
    let json = serde_json::to_string_pretty(&report).expect("Failed to serialize report");

    assert!(json.contains("\"result\": \"FAIL\""));
    assert!(json.contains("\"coverage_pct\": \"71.4\""));

    let round_trip: Report = serde_json::from_str(&json).expect("Failed to deserialize report");
    assert_eq!(report, round_trip);
}
