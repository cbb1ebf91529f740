//! Archive Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The archive file does not exist.
    #[display("archive not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The file exists but is not a readable zip container.
    #[display("not an archive: {}", _0.display())]
    NotAnArchive(#[error(not(source))] PathBuf),
    /// The container is readable but an entry is corrupt.
    #[display("invalid or corrupted archive data")]
    InvalidData,
    /// The requested entry does not exist in the archive.
    #[display("no such entry: {_0}")]
    EntryNotFound(#[error(not(source))] String),
    /// An entry name is empty or would escape the extraction directory.
    #[display("invalid entry name: {_0}")]
    InvalidEntry(#[error(not(source))] String),
    /// The file to append does not exist on disk.
    #[display("no such file: {}", _0.display())]
    MissingSource(#[error(not(source))] PathBuf),
    /// The archive already holds an entry with the same name.
    #[display("duplicate entry: {_0}")]
    DuplicateEntry(#[error(not(source))] String),
    /// The requested compression is not supported.
    #[display("unsupported compression: {_0}")]
    UnsupportedCompression(#[error(not(source))] String),
    /// An I/O operation failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}
