//! Extracted pages awaiting placement.

use rechapter_extract::error::Result as ExtractResult;
use rechapter_extract::{FormatSpec, models::Metadata};
use std::cmp::Ordering;
use std::path::PathBuf;

/// A page on disk together with the metadata parsed from its filename.
///
/// Ordered by reading order of its [`Metadata`] only; the path never takes
/// part in comparisons.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub path: PathBuf,
    pub metadata: Metadata,
}
impl PageRecord {
    /// Parses the basename of `path` with `spec`. Directories leading up to the
    /// page are ignored.
    pub fn from_path(path: PathBuf, spec: &FormatSpec) -> ExtractResult<Self> {
        let filename = path.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
        let metadata = spec.extract(&filename)?;
        Ok(Self { path, metadata })
    }
}
impl Ord for PageRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.metadata.cmp(&other.metadata)
    }
}
impl PartialOrd for PageRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for PageRecord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for PageRecord {}
