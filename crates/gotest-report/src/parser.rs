// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Format detection and the top-level parse entry points
//!
//! The first line that starts with `{` or `=` decides the input format. Lines
//! seen before that are kept in a backlog and replayed into the chosen parser,
//! so nothing read during detection is lost. If no line ever decides, the text
//! parser gets the whole backlog at end of input.

use std::io::BufRead;

use tracing::debug;

use crate::error::ParseError;
use crate::json::JsonParser;
use crate::report::Report;
use crate::text::TextParser;

/// A line-at-a-time parser for one input encoding
pub trait LineParser {
    /// Fold one input line into the report being built
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be parsed in this encoding.
    fn ingest_line(&mut self, line: &str) -> Result<(), ParseError>;

    /// Finalize and return the report
    ///
    /// # Errors
    ///
    /// Returns an error if the accumulated state cannot form a report.
    fn finish(self: Box<Self>) -> Result<Report, ParseError>;
}

/// Input encodings understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `go test -json` event stream
    StructuredEvent,
    /// `go test -v` text
    FreeText,
}

impl Format {
    /// Classify a line by its first character
    ///
    /// Returns `None` if the line does not identify either format.
    #[must_use]
    pub fn classify(line: &str) -> Option<Self> {
        if line.starts_with('{') {
            Some(Self::StructuredEvent)
        } else if line.starts_with('=') {
            Some(Self::FreeText)
        } else {
            None
        }
    }

    /// Create a parser for this format
    #[must_use]
    pub fn parser(self, fallback: &str) -> Box<dyn LineParser> {
        match self {
            Self::StructuredEvent => Box::new(JsonParser::new(fallback)),
            Self::FreeText => Box::new(TextParser::new(fallback)),
        }
    }
}

enum State {
    Undecided { backlog: Vec<String> },
    Decided {
        format: Format,
        parser: Box<dyn LineParser>,
    },
}

/// Detects the input format and forwards lines to the matching parser
pub struct Detector {
    fallback: String,
    state: State,
    line_no: usize,
}

impl Detector {
    /// Create a detector; `fallback` names the package if the input never does
    #[must_use]
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
            state: State::Undecided {
                backlog: Vec::new(),
            },
            line_no: 0,
        }
    }

    /// The detected format, once decided
    #[must_use]
    pub fn format(&self) -> Option<Format> {
        match &self.state {
            State::Undecided { .. } => None,
            State::Decided { format, .. } => Some(*format),
        }
    }

    /// Number of lines waiting for a format decision
    #[must_use]
    pub fn backlog_len(&self) -> usize {
        match &self.state {
            State::Undecided { backlog } => backlog.len(),
            State::Decided { .. } => 0,
        }
    }

    /// Process a single line of input
    ///
    /// # Errors
    ///
    /// Returns the parser's error, tagged with the line number, if this line or
    /// a replayed backlog line is rejected.
    pub fn push_line(&mut self, line: &str) -> Result<(), ParseError> {
        self.line_no += 1;
        match &mut self.state {
            State::Decided { parser, .. } => ingest(parser.as_mut(), line, self.line_no),
            State::Undecided { backlog } => {
                let Some(format) = Format::classify(line) else {
                    backlog.push(line.to_string());
                    return Ok(());
                };
                debug!(?format, line = self.line_no, "Detected input format");

                let backlog = std::mem::take(backlog);
                let mut parser = format.parser(&self.fallback);
                replay(parser.as_mut(), backlog)?;
                ingest(parser.as_mut(), line, self.line_no)?;
                self.state = State::Decided { format, parser };
                Ok(())
            }
        }
    }

    /// Finish parsing and return the report
    ///
    /// # Errors
    ///
    /// Returns an error if the backlog cannot be replayed or the parser fails
    /// to finalize.
    pub fn finish(self) -> Result<Report, ParseError> {
        let parser = match self.state {
            State::Decided { parser, .. } => parser,
            State::Undecided { backlog } => {
                debug!(
                    lines = backlog.len(),
                    "No format marker found, assuming text output"
                );
                let mut parser = Format::FreeText.parser(&self.fallback);
                replay(parser.as_mut(), backlog)?;
                parser
            }
        };
        parser.finish()
    }
}

fn ingest(parser: &mut dyn LineParser, line: &str, line_no: usize) -> Result<(), ParseError> {
    parser
        .ingest_line(line)
        .map_err(|err| err.at_line(line_no))
}

/// Backlog lines are always the first lines of the input
fn replay(parser: &mut dyn LineParser, backlog: Vec<String>) -> Result<(), ParseError> {
    for (idx, line) in backlog.iter().enumerate() {
        ingest(parser, line, idx + 1)?;
    }
    Ok(())
}

/// Parse `go test` output from a reader
///
/// `fallback_package` names the package when the input never does, for
/// example text output without a final `ok`/`FAIL` line.
///
/// # Errors
///
/// Returns `ParseError::Io` if reading fails, or the parser's error if a line
/// is rejected. No partial report is returned.
pub fn parse<R: BufRead>(mut reader: R, fallback_package: &str) -> Result<Report, ParseError> {
    let mut detector = Detector::new(fallback_package);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        detector.push_line(&String::from_utf8_lossy(line))?;
    }

    detector.finish()
}

/// Parse `go test` output held in memory
///
/// # Errors
///
/// Returns the parser's error if a line is rejected.
pub fn parse_str(input: &str, fallback_package: &str) -> Result<Report, ParseError> {
    parse(input.as_bytes(), fallback_package)
}
