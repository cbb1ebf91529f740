//! Command-line Error Types
//!
//! Everything that stops a run before any archive is touched.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A setup error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command-line setup.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("invalid compression format")]
    Compression,
    #[display("invalid archive name template")]
    Template,
    #[display("could not open the session journal")]
    Journal,
    /// The journal would be deleted along with the destination.
    #[display("journal {} is inside the destination directory", _0.display())]
    JournalInDestination(#[error(not(source))] PathBuf),
    #[display("could not prepare the destination")]
    Run,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
