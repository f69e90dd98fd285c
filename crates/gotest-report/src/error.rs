// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gotest-report

use thiserror::Error;

/// Errors that can occur while parsing `go test` output
#[derive(Debug, Error)]
pub enum ParseError {
    /// Error reading from the input
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A structured event line is not valid JSON
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A duration could not be read as a non-negative number of seconds
    #[error("Invalid duration: {value}")]
    InvalidDuration {
        /// The offending duration text
        value: String,
    },

    /// An ingestion error, tagged with the 1-based input line it came from
    #[error("line {line}: {source}")]
    AtLine {
        /// Line number in the input stream
        line: usize,
        /// The underlying error
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Tag this error with the input line it occurred on
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::AtLine { .. } | Self::Io(_) => self,
            other => Self::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }

    /// The line number this error was tagged with, if any
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Strip any line annotation and return the underlying error
    #[must_use]
    pub fn into_inner(self) -> Self {
        match self {
            Self::AtLine { source, .. } => source.into_inner(),
            other => other,
        }
    }
}
