// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotest-report: `go test` output parsing
//!
//! This library crate turns the output of `go test` into a [`Report`]: a tree of
//! packages, each with its tests, their outcomes, durations and captured output.
//!
//! Two input encodings are supported and detected automatically:
//! - the JSON event stream of `go test -json` (one event object per line)
//! - the human readable log of `go test -v`
//!
//! # Example
//!
//! ```
//! use gotest_report::{TestResult, parse_str};
//!
//! let output = "=== RUN   TestAdd\n--- PASS: TestAdd (0.01s)\nPASS\nok  \texample.com/calc\t0.015s\n";
//! let report = parse_str(output, "").unwrap();
//!
//! assert_eq!(report.packages[0].name, "example.com/calc");
//! assert_eq!(report.packages[0].tests[0].result, Some(TestResult::Pass));
//! assert_eq!(report.failures(), 0);
//! ```
//!
//! Callers that already own a line iterator can drive the [`Detector`] directly:
//!
//! ```
//! use gotest_report::Detector;
//!
//! let mut detector = Detector::new("example.com/calc");
//! detector.push_line(r#"{"Action":"run","Test":"TestAdd"}"#).unwrap();
//! detector.push_line(r#"{"Action":"fail","Test":"TestAdd","Elapsed":0.2}"#).unwrap();
//! let report = detector.finish().unwrap();
//! assert_eq!(report.failures(), 1);
//! ```

pub mod error;
pub mod json;
pub mod parser;
pub mod report;
pub mod text;

pub use error::ParseError;
pub use json::{Action, JsonParser, TestEvent};
pub use parser::{Detector, Format, LineParser, parse, parse_str};
pub use report::{Package, Report, Test, TestResult};
pub use text::TextParser;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::ParseError;
    pub use crate::parser::{LineParser, parse, parse_str};
    pub use crate::report::{Package, Report, Test, TestResult};
}
