//! Zip container primitives for page archives.
//!
//! This crate wraps the [`zip`] crate behind the handful of operations the
//! reorganizer needs:
//!
//! - **Detection** of valid containers ([`is_archive`])
//! - **Listing** file entries in their original order ([`list_entries`])
//! - **Extraction** of single entries or whole archives to a directory
//!   ([`extract_entry`], [`extract_all`]), with entry names sanitized so
//!   nothing escapes the destination
//! - **Appending** a file on disk to an archive, creating it when absent
//!   ([`append_entry`])
//!
//! Entries are flat: the name written into an archive is always the basename
//! of the source file. Deflate uses the highest available level, prioritizing
//! archive size over speed.

#[cfg(feature = "cli")]
pub mod cli;
mod construct;
pub mod error;
mod ops;
mod path;
mod util;

pub use crate::ops::{append_entry, extract_all, extract_all_with, extract_entry, is_archive, list_entries};
pub use crate::path::sanitize as sanitize_entry;

/// How entries are stored when appended to an archive.
///
/// Only affects the bytes on disk; entry names and decompressed contents are
/// identical either way. Defaults to [`Deflated`](Self::Deflated).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Compression {
    /// No compression (page images are usually compressed already)
    Stored,
    /// Deflate at the highest level
    #[default]
    Deflated,
}
