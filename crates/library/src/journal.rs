//! Human-readable session journal.
//!
//! The journal is a plain text record of what a run did, one timestamped line
//! per event. It complements `tracing` output: tracing is for diagnosing the
//! program, the journal is for the person who ran it.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// A sink for journal lines.
///
/// Recording never fails from the caller's point of view; a journal that
/// cannot be written to reports the problem through `tracing` instead.
pub trait Journal {
    fn record(&mut self, message: &str);
}
impl<J: Journal + ?Sized> Journal for &mut J {
    fn record(&mut self, message: &str) {
        (**self).record(message);
    }
}

/// A journal written to a file as `[<timestamp>]: <message>` lines.
#[derive(Debug)]
pub struct FileJournal {
    path: PathBuf,
    file: File,
}
impl FileJournal {
    /// Opens `path` for a new session, discarding whatever a previous session
    /// wrote, and records the session start.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).or_raise(|| ErrorKind::Journal)?;
        let mut journal = Self { path: path.to_path_buf(), file };
        journal.record("New Session");
        Ok(journal)
    }

    /// Opens `path` without truncating it, appending to previous sessions.
    pub fn append(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path).or_raise(|| ErrorKind::Journal)?;
        let mut journal = Self { path: path.to_path_buf(), file };
        journal.record("New Session");
        Ok(journal)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
impl Journal for FileJournal {
    fn record(&mut self, message: &str) {
        let line = format!("[{}]: {message}\n", timestamp());
        if let Err(error) = self.file.write_all(line.as_bytes()) {
            tracing::warn!(path = %self.path.display(), %error, "Could not write to journal");
        }
    }
}

/// A journal kept in memory, mostly useful for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryJournal {
    lines: Vec<String>,
}
impl MemoryJournal {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, message: &str) -> bool {
        self.lines.iter().any(|line| line == message)
    }
}
impl Journal for MemoryJournal {
    fn record(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }
}

fn timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339).unwrap_or_else(|_| now.unix_timestamp().to_string())
}
