//! Error types for ARPA model reading.

use thiserror::Error;

/// Result type for reader operations.
pub type Result<T> = std::result::Result<T, ArpaError>;

/// Every failure the reader can report. All of them abort the parse.
#[derive(Debug, Error)]
pub enum ArpaError {
    /// The input could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A `ngram <order>=<count>` line in the header is malformed.
    #[error("bad ARPA header at line {line_number} ({reason}): {line}")]
    Header {
        line_number: u64,
        line: String,
        reason: String,
    },

    /// Input ended before the `\1-grams:` section marker was seen.
    #[error("input ended after {lines_read} lines without a \\1-grams: section")]
    MissingUnigramSection { lines_read: u64 },

    /// A data line does not match the shape of the current order.
    #[error("bad ARPA line {line_number} ({kind}): {line}")]
    Entry {
        line_number: u64,
        line: String,
        kind: EntryErrorKind,
    },

    /// The reader was configured with values it cannot work with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The cancellation flag was raised while reading.
    #[error("parse cancelled at line {line_number}")]
    Cancelled { line_number: u64 },
}

/// What exactly was wrong with a data line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryErrorKind {
    #[error("expected {expected} or {max} tokens for a {order}-gram, found {found}", max = .expected + 1)]
    TokenCount {
        order: usize,
        expected: usize,
        found: usize,
    },

    #[error("unparsable log-probability {0:?}")]
    BadProbability(String),

    #[error("log-probability {0} is not <= 0")]
    InvalidProbability(f32),

    #[error("unparsable backoff weight {0:?}")]
    BadBackoff(String),
}

impl ArpaError {
    /// Line number the error was detected at, when it is tied to one.
    pub fn line_number(&self) -> Option<u64> {
        match self {
            ArpaError::Header { line_number, .. }
            | ArpaError::Entry { line_number, .. }
            | ArpaError::Cancelled { line_number } => Some(*line_number),
            _ => None,
        }
    }
}
