//! Error types for the [`reorganize`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A reorganize error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for reorganize operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a reorganize failure.
///
/// ### Input Errors
/// - [`ErrorKind::InputNotFound`]
/// - [`ErrorKind::NotAnArchive`]
/// - [`ErrorKind::Metadata`]
///
/// ### Dependency Errors
/// - [`ErrorKind::Extract`]
/// - [`ErrorKind::Template`]
/// - [`ErrorKind::Append`]
/// - [`ErrorKind::Filesystem`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source path does not exist.
    #[display("no such file or directory: {}", _0.display())]
    InputNotFound(#[error(not(source))] PathBuf),
    /// A single-file source that is not a zip container.
    #[display("not an archive: {}", _0.display())]
    NotAnArchive(#[error(not(source))] PathBuf),
    /// The source sits inside the destination, which is wiped before a run.
    #[display("source {} is inside the destination directory", _0.display())]
    SourceInDestination(#[error(not(source))] PathBuf),
    /// The input archive could not be unpacked into the scratch directory.
    #[display("could not extract input archive")]
    Extract,
    /// A page filename does not follow the format.
    #[display("filename does not match the format: {_0}")]
    Metadata(#[error(not(source))] String),
    /// No archive name could be rendered for a page.
    #[display("could not name the chapter archive")]
    Template,
    /// A page could not be appended to its chapter archive.
    #[display("could not append page to chapter archive")]
    Append,
    /// Preparing or cleaning the destination or scratch directory failed.
    #[display("filesystem operation failed")]
    Filesystem,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Filesystem)
    }
}
