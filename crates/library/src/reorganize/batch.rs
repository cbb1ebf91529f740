//! Running a reorganize over a file or a directory of archives.

use super::Reorganizer;
use super::archive::ArchiveReport;
use super::error::{Error as ReorganizeError, ErrorKind as ReorganizeErrorKind, Result as ReorganizeResult};
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::journal::Journal;
use crate::progress::Progress;
use exn::{Exn, ResultExt};
use rechapter_archive::is_archive;
use rechapter_extract::FormatSpec;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// An input that could not be reorganized.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: ReorganizeError,
}
impl Failure {
    pub fn kind(&self) -> &ReorganizeErrorKind {
        &self.error
    }
}

/// Everything a [`run`](Reorganizer::run) did.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Archives reorganized successfully, in processing order.
    pub archives: Vec<ArchiveReport>,
    /// Inputs that failed, in processing order.
    pub failures: Vec<Failure>,
    /// Files in a source directory that are not archives.
    pub skipped: Vec<PathBuf>,
}
impl RunReport {
    /// Returns `true` if any input failed.
    pub fn failed(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Total pages appended across all archives.
    pub fn pages(&self) -> usize {
        self.archives.iter().map(|archive| archive.pages).sum()
    }

    fn fail(&mut self, path: &Path, error: ReorganizeError) {
        self.failures.push(Failure { path: path.to_path_buf(), error });
    }
}

impl<J: Journal, P: Progress> Reorganizer<J, P> {
    /// Reorganizes every archive `source` resolves to into `destination`.
    ///
    /// `source` is either an archive or a directory whose archives (by file
    /// name order, not recursing) are processed in turn. The destination is
    /// deleted and recreated before anything is written to it, so running
    /// twice with the same inputs gives the same result.
    ///
    /// A source that is missing, not an archive, or an archive that fails to
    /// reorganize is recorded as a [`Failure`] without stopping the run.
    ///
    /// # Errors
    /// Only failures that make the whole run impossible are returned: the
    /// destination could not be reset, or it contains `source`.
    #[instrument(skip_all, fields(source = %source.display(), destination = %destination.display(), format = %spec))]
    pub fn run(&mut self, source: &Path, spec: &FormatSpec, destination: &Path) -> LibraryResult<RunReport> {
        let mut report = RunReport::default();
        let archives = self.discover(source, &mut report);
        self.reset_destination(source, destination).or_raise(|| LibraryErrorKind::Reorganize)?;

        for archive in archives {
            let name = archive.file_name().unwrap_or(archive.as_os_str()).to_string_lossy().into_owned();
            self.journal.record(&format!("Processing [{name}]"));
            tracing::info!(archive = %archive.display(), "Processing archive");
            match self.reorganize_inner(&archive, spec, destination) {
                Ok(archive_report) => report.archives.push(archive_report),
                Err(error) => {
                    self.journal.record(&format!("Failed [{name}]: {error}"));
                    tracing::warn!(archive = %archive.display(), %error, "Archive could not be reorganized");
                    report.fail(&archive, error);
                },
            }
        }

        self.journal.record("All done!");
        tracing::info!(
            archives = report.archives.len(),
            pages = report.pages(),
            failures = report.failures.len(),
            skipped = report.skipped.len(),
            "Run complete"
        );
        Ok(report)
    }

    /// Resolves `source` into the archives to process. Problems with the source
    /// itself are recorded in `report`.
    fn discover(&mut self, source: &Path, report: &mut RunReport) -> Vec<PathBuf> {
        if source.is_file() {
            if is_archive(source) {
                return vec![source.to_path_buf()];
            }
            self.journal.record(&format!("Not an archive: {}", source.display()));
            tracing::warn!(source = %source.display(), "Source is not an archive");
            report.fail(source, Exn::from(ReorganizeErrorKind::NotAnArchive(source.to_path_buf())));
            return vec![];
        }
        if !source.is_dir() {
            self.journal.record(&format!("No such file or directory: {}", source.display()));
            tracing::warn!(source = %source.display(), "Source does not exist");
            report.fail(source, Exn::from(ReorganizeErrorKind::InputNotFound(source.to_path_buf())));
            return vec![];
        }

        let entries = match fs::read_dir(source).or_raise(|| ReorganizeErrorKind::Filesystem) {
            Ok(entries) => entries,
            Err(error) => {
                report.fail(source, error);
                return vec![];
            },
        };
        let mut files: Vec<PathBuf> =
            entries.filter_map(|entry| entry.ok().map(|entry| entry.path())).filter(|path| path.is_file()).collect();
        files.sort();

        let (archives, skipped): (Vec<_>, Vec<_>) = files.into_iter().partition(|path| is_archive(path));
        for path in &skipped {
            self.journal.record(&format!("Skipping, not an archive: {}", path.display()));
            tracing::debug!(path = %path.display(), "Skipping non-archive");
        }
        tracing::debug!(archives = archives.len(), skipped = skipped.len(), "Discovered inputs");
        report.skipped = skipped;
        archives
    }

    /// Deletes `destination` if present and creates it empty.
    fn reset_destination(&mut self, source: &Path, destination: &Path) -> ReorganizeResult<()> {
        if let (Ok(source), Ok(destination)) = (source.canonicalize(), destination.canonicalize())
            && source.starts_with(&destination)
        {
            exn::bail!(ReorganizeErrorKind::SourceInDestination(source));
        }
        if destination.is_dir() {
            self.journal.record(&format!("Removing output directory: {}", destination.display()));
            fs::remove_dir_all(destination).or_raise(|| ReorganizeErrorKind::Filesystem)?;
        }
        fs::create_dir_all(destination).or_raise(|| ReorganizeErrorKind::Filesystem)?;
        self.journal.record(&format!("Created output directory: {}", destination.display()));
        Ok(())
    }
}
