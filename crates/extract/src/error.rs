//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Ways a filename can fail to match a [`FormatSpec`](crate::FormatSpec).
///
/// Every variant means the filename is malformed with respect to the format;
/// the same filename will fail the same way every time.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A capture's first lexeme closes a group it never opened, e.g. `01]`.
    #[display("capture '{field}' has no opening marker in lexeme: {lexeme}")]
    MissingOpeningMarker {
        /// The field being captured.
        field: String,
        /// The offending lexeme.
        lexeme: String,
    },
    /// A capture was opened but the filename ended before it was closed.
    #[display("capture '{_0}' is never closed")]
    UnterminatedCapture(#[error(not(source))] String),
    /// A `loop` token's target lexeme never appears in the filename.
    #[display("skip target not found: {_0}")]
    SkipTargetNotFound(#[error(not(source))] String),
    /// A required field was not populated by any token.
    #[display("missing required field: {_0}")]
    MissingField(#[error(not(source))] &'static str),
    /// A numeric field was found but could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// The raw captured value.
        value: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Filenames either match the format or they don't.
        false
    }
}
