// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

use crate::parser::ParserError;

/// The kinds of failure the review core and its callers can report.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum ErrorKind {
    /// A scheduler was constructed with zero cards.
    EmptyDeck,
    /// A rating outside 1..=5.
    InvalidRating(String),
    /// The selected draw pool was empty and no fallback remained.
    PoolUnderflow,
    /// A bad command-line argument or path.
    Argument(String),
    /// A card file could not be read.
    FileRead(String),
    /// A card file could not be parsed.
    Parse(String),
    /// The review session was shut down before being ended deliberately.
    Interrupted,
    /// Any other I/O failure.
    Io(String),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            ErrorKind::EmptyDeck => write!(f, "cannot review an empty deck"),
            ErrorKind::InvalidRating(got) => {
                write!(f, "invalid rating: {got} (expected 1 to 5)")
            }
            ErrorKind::PoolUnderflow => write!(f, "no card left to draw"),
            ErrorKind::Argument(msg) => write!(f, "{msg}"),
            ErrorKind::FileRead(path) => write!(f, "could not read {path}"),
            ErrorKind::Parse(msg) => write!(f, "{msg}"),
            ErrorKind::Interrupted => write!(f, "session interrupted before completion"),
            ErrorKind::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

/// An error plus an optional traceback, surfaced to the user verbatim.
#[derive(Debug, PartialEq, Serialize)]
pub struct ErrorReport {
    error: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    traceback: Option<String>,
}

impl ErrorReport {
    pub fn new(error: ErrorKind) -> Self {
        ErrorReport {
            error,
            traceback: None,
        }
    }

    pub fn with_traceback(error: ErrorKind, traceback: impl Into<String>) -> Self {
        ErrorReport {
            error,
            traceback: Some(traceback.into()),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error
    }
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport::with_traceback(ErrorKind::Io(value.to_string()), format!("{value:#?}"))
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport::new(ErrorKind::Io(format!("JSON error: {value}")))
    }
}

impl From<ParserError> for ErrorReport {
    fn from(value: ParserError) -> Self {
        ErrorReport::new(ErrorKind::Parse(value.to_string()))
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "error: {}", self.error)?;
        if let Some(traceback) = &self.traceback {
            write!(f, "\n{traceback}")?;
        }
        Ok(())
    }
}

impl Error for ErrorReport {}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(error: ErrorKind) -> Fallible<T> {
    Err(ErrorReport::new(error))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The wire shape is `{"error": {"type": ..., "message": ...}}` with an
    /// optional `traceback` key, matching what the shell shows the user.
    #[test]
    fn test_serialization_format() -> Fallible<()> {
        let report = ErrorReport::new(ErrorKind::FileRead("cards.md".to_string()));
        let serialized = serde_json::to_string(&report)?;
        assert_eq!(
            serialized,
            r#"{"error":{"type":"FileRead","message":"cards.md"}}"#
        );

        let report = ErrorReport::with_traceback(ErrorKind::EmptyDeck, "backtrace goes here");
        let serialized = serde_json::to_string(&report)?;
        assert_eq!(
            serialized,
            r#"{"error":{"type":"EmptyDeck"},"traceback":"backtrace goes here"}"#
        );
        Ok(())
    }

    #[test]
    fn test_display() {
        let report = ErrorReport::new(ErrorKind::InvalidRating("9".to_string()));
        assert_eq!(report.to_string(), "error: invalid rating: 9 (expected 1 to 5)");

        let report = ErrorReport::with_traceback(ErrorKind::PoolUnderflow, "tb");
        assert_eq!(report.to_string(), "error: no card left to draw\ntb");
    }

    #[test]
    fn test_io_error_carries_traceback() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let report = ErrorReport::from(io);
        assert!(matches!(report.kind(), ErrorKind::Io(_)));
        assert!(report.traceback.is_some());
    }
}
