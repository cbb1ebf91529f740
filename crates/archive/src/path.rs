//! Entry name validation.
//!
//! Archive entry names come from untrusted input; they are resolved here into
//! a relative path that can never leave the extraction directory.

use crate::error::{ErrorKind, Result};
use std::path::{Component, Path, PathBuf};

/// Resolves an archive entry name into a safe, relative path.
///
/// `..` components are resolved against the components before them and may
/// never climb above the root. Leading `/` and `.` components are dropped.
/// Null bytes, Windows prefixes and names that resolve to nothing are
/// rejected with [`InvalidEntry`](crate::error::ErrorKind::InvalidEntry).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use rechapter_archive::sanitize_entry;
/// assert_eq!(sanitize_entry("pages/001.jpg").unwrap(), Path::new("pages/001.jpg"));
/// assert_eq!(sanitize_entry("/001.jpg").unwrap(), Path::new("001.jpg"));
/// assert!(sanitize_entry("../../etc/passwd").is_err());
/// assert!(sanitize_entry("pages/").is_ok());
/// ```
pub fn sanitize(name: impl AsRef<str>) -> Result<PathBuf> {
    let name = name.as_ref();
    let mut components = Vec::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(s) => {
                // Null bytes survive Path::components() on Unix but truncate
                // paths in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidEntry(name.to_string()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidEntry(name.to_string())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidEntry(name.to_string()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidEntry(name.to_string())),
        false => Ok(components.into_iter().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("001.jpg", "001.jpg")]
    #[case("chapter/001.jpg", "chapter/001.jpg")]
    #[case("./chapter//001.jpg", "chapter/001.jpg")]
    #[case("/absolute/001.jpg", "absolute/001.jpg")]
    #[case("a/../001.jpg", "001.jpg")]
    #[case("chapter/", "chapter")]
    fn test_valid_entries(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(sanitize(name).unwrap(), Path::new(expected));
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("../001.jpg")]
    #[case("a/../../001.jpg")]
    #[case("a\0b.jpg")]
    fn test_rejected_entries(#[case] name: &str) {
        let err = sanitize(name).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidEntry(n) if n == name));
    }
}
