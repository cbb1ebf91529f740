//! Reorganizing a single input archive.

use super::Reorganizer;
use super::error::{ErrorKind as ReorganizeErrorKind, Result as ReorganizeResult};
use super::record::PageRecord;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::journal::Journal;
use crate::progress::{Progress, Stage};
use exn::ResultExt;
use rechapter_archive::error::ErrorKind as ArchiveErrorKind;
use rechapter_archive::{append_entry, extract_all_with};
use rechapter_extract::FormatSpec;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// What reorganizing one input archive produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// The input archive.
    pub source: PathBuf,
    /// Pages appended to a chapter archive.
    pub pages: usize,
    /// Chapter archive filenames written to, in the order first touched.
    pub chapters: Vec<String>,
    /// Pages that disappeared from the scratch directory before they could be
    /// appended.
    pub missing: Vec<PathBuf>,
    /// Pages left out because their chapter archive already holds an entry
    /// with the same name.
    pub duplicates: Vec<PathBuf>,
}
impl ArchiveReport {
    fn new(source: &Path) -> Self {
        Self { source: source.to_path_buf(), ..Default::default() }
    }
}

impl<J: Journal, P: Progress> Reorganizer<J, P> {
    /// Splits the pages of `archive` into per-chapter archives inside
    /// `output_dir`.
    ///
    /// Pages are unpacked into the scratch directory under `output_dir`,
    /// parsed with `spec`, and appended in reading order to the archive named
    /// by the [`NameGenerator`](crate::NameGenerator). Chapter archives that
    /// already exist are appended to. The scratch directory is removed
    /// afterwards whether or not reorganizing succeeded.
    ///
    /// # Errors
    /// Returns [`Exn<LibraryErrorKind::Reorganize>`](LibraryErrorKind::Reorganize)
    /// raised from an inner [`Exn<ReorganizeErrorKind>`](ReorganizeErrorKind).
    /// Pages appended before the failure stay in their chapter archives.
    pub fn reorganize(&mut self, archive: &Path, spec: &FormatSpec, output_dir: &Path) -> LibraryResult<ArchiveReport> {
        self.reorganize_inner(archive, spec, output_dir).or_raise(|| LibraryErrorKind::Reorganize)
    }

    #[instrument(skip_all, fields(archive = %archive.display()))]
    pub(crate) fn reorganize_inner(
        &mut self,
        archive: &Path,
        spec: &FormatSpec,
        output_dir: &Path,
    ) -> ReorganizeResult<ArchiveReport> {
        let scratch = output_dir.join(&self.scratch);
        let result = self.unpack(archive, &scratch).and_then(|pages| {
            let mut report = ArchiveReport::new(archive);
            self.package(pages, spec, output_dir, &mut report)?;
            Ok(report)
        });
        let cleanup = self.remove_scratch(&scratch);
        self.progress.finish();
        let report = result?;
        cleanup?;
        tracing::info!(pages = report.pages, chapters = report.chapters.len(), "Archive reorganized");
        Ok(report)
    }

    fn unpack(&mut self, archive: &Path, scratch: &Path) -> ReorganizeResult<Vec<PathBuf>> {
        self.journal.record(&format!("Decompressing: {}", archive.display()));
        self.journal.record(&format!("Extracting to: {}", scratch.display()));
        let progress = &mut self.progress;
        let pages = extract_all_with(archive, scratch, |done, total| progress.update(Stage::Decompressing, done, total))
            .or_raise(|| ReorganizeErrorKind::Extract)?;
        tracing::debug!(pages = pages.len(), scratch = %scratch.display(), "Extracted pages");
        Ok(pages)
    }

    /// Parses every page, then drains them in reading order into their
    /// chapter archives.
    ///
    /// A page whose file has vanished, or whose name is already taken in its
    /// chapter archive, is noted in `report` and skipped; any other failure
    /// stops the archive.
    pub(crate) fn package(
        &mut self,
        pages: Vec<PathBuf>,
        spec: &FormatSpec,
        output_dir: &Path,
        report: &mut ArchiveReport,
    ) -> ReorganizeResult<()> {
        let total = pages.len();
        let mut heap = BinaryHeap::with_capacity(total);
        for (index, path) in pages.into_iter().enumerate() {
            let filename = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
            let record =
                PageRecord::from_path(path, spec).or_raise(|| ReorganizeErrorKind::Metadata(filename.clone()))?;
            tracing::trace!(filename, metadata = ?record.metadata, "Parsed page");
            heap.push(Reverse(record));
            self.progress.update(Stage::Exploring, index + 1, total);
        }

        let mut previous: Option<String> = None;
        let mut done = 0;
        while let Some(Reverse(page)) = heap.pop() {
            done += 1;
            let name = self.names.generate(&page.metadata).or_raise(|| ReorganizeErrorKind::Template)?;
            if let Some(done) = previous.as_deref()
                && done != name
            {
                self.finish_chapter(done);
            }
            if !report.chapters.contains(&name) {
                report.chapters.push(name.clone());
            }

            let target = output_dir.join(&name);
            match append_entry(&target, &page.path, self.compression) {
                Ok(()) => report.pages += 1,
                Err(err) if matches!(&*err, ArchiveErrorKind::MissingSource(_)) => {
                    self.journal.record(&format!("No such file: {}", page.path.display()));
                    tracing::warn!(page = %page.path.display(), "Page vanished before it could be appended");
                    report.missing.push(page.path);
                },
                Err(err) if matches!(&*err, ArchiveErrorKind::DuplicateEntry(_)) => {
                    self.journal.record(&format!("Already in {name}, skipped: {}", page.path.display()));
                    tracing::warn!(page = %page.path.display(), chapter = %name, "Chapter archive already holds this page");
                    report.duplicates.push(page.path);
                },
                Err(err) => return Err(err).or_raise(|| ReorganizeErrorKind::Append),
            }
            self.progress.update(Stage::Compressing, done, total);
            previous = Some(name);
        }
        if let Some(done) = previous {
            self.finish_chapter(&done);
        }
        Ok(())
    }

    fn finish_chapter(&mut self, name: &str) {
        self.journal.record(&format!("{name} - DONE!"));
        tracing::debug!(chapter = name, "Chapter archive complete");
    }

    fn remove_scratch(&mut self, scratch: &Path) -> ReorganizeResult<()> {
        self.journal.record(&format!("Removing temporary directory: {}", scratch.display()));
        match fs::remove_dir_all(scratch) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err).or_raise(|| ReorganizeErrorKind::Filesystem),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::MemoryJournal;
    use crate::template::NameGenerator;
    use rechapter_archive::{Compression, list_entries};
    use std::collections::HashSet;

    /// Remembers every update, in order.
    #[derive(Debug, Default)]
    struct RecordedProgress {
        updates: Vec<(Stage, usize, usize)>,
        finished: usize,
    }
    impl Progress for RecordedProgress {
        fn update(&mut self, stage: Stage, done: usize, total: usize) {
            self.updates.push((stage, done, total));
        }

        fn finish(&mut self) {
            self.finished += 1;
        }
    }

    const FORMAT: &str = "[scanner]|loopVol|[volume]|loopCh|[chapter]|loopPg|[page]|[name]";

    fn reorganizer() -> Reorganizer<MemoryJournal> {
        Reorganizer::new(NameGenerator::default_template().unwrap(), MemoryJournal::default())
    }

    /// Builds `<dir>/<name>` holding one entry per filename, in the given order.
    fn make_archive(dir: &Path, name: &str, pages: &[&str]) -> PathBuf {
        let staging = tempfile::tempdir().unwrap();
        let archive = dir.join(name);
        for page in pages {
            let path = staging.path().join(page);
            fs::write(&path, page.as_bytes()).unwrap();
            append_entry(&archive, &path, Compression::Stored).unwrap();
        }
        archive
    }

    fn files_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> =
            fs::read_dir(dir).unwrap().map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_groups_pages_by_chapter_in_reading_order() {
        let temp = tempfile::tempdir().unwrap();
        let output = temp.path().join("output");
        fs::create_dir(&output).unwrap();
        let archive = make_archive(
            temp.path(),
            "input.cbz",
            &[
                "[TeamX] Vol 01 Ch 002 Pg 02 Intro.jpg",
                "[TeamX] Vol 01 Ch 001 Pg 10 Intro.jpg",
                "[TeamX] Vol 01 Ch 002 Pg 01 Intro.jpg",
                "[TeamX] Vol 01 Ch 001 Pg 02 Intro.jpg",
            ],
        );

        let mut reorganizer = reorganizer();
        let report = reorganizer.reorganize(&archive, &FormatSpec::new(FORMAT), &output).unwrap();

        assert_eq!(report.source, archive);
        assert_eq!(report.pages, 4);
        assert!(report.missing.is_empty());
        assert_eq!(report.chapters, vec!["TeamX_Vol. 1 Ch. 1 - Intro.jpg.cbz", "TeamX_Vol. 1 Ch. 2 - Intro.jpg.cbz"]);
        assert_eq!(files_in(&output), report.chapters);
        assert_eq!(
            list_entries(output.join(&report.chapters[0])).unwrap(),
            vec!["[TeamX] Vol 01 Ch 001 Pg 02 Intro.jpg", "[TeamX] Vol 01 Ch 001 Pg 10 Intro.jpg"]
        );
        assert_eq!(
            list_entries(output.join(&report.chapters[1])).unwrap(),
            vec!["[TeamX] Vol 01 Ch 002 Pg 01 Intro.jpg", "[TeamX] Vol 01 Ch 002 Pg 02 Intro.jpg"]
        );

        let journal = reorganizer.journal();
        assert!(journal.contains("TeamX_Vol. 1 Ch. 1 - Intro.jpg.cbz - DONE!"));
        assert!(journal.contains("TeamX_Vol. 1 Ch. 2 - Intro.jpg.cbz - DONE!"));
    }

    #[test]
    fn test_every_page_lands_in_exactly_one_chapter() {
        let temp = tempfile::tempdir().unwrap();
        let output = temp.path().join("output");
        fs::create_dir(&output).unwrap();
        let pages: Vec<String> = (1..=3)
            .flat_map(|chapter| (1..=4).map(move |page| format!("[S] Vol 2 Ch {chapter} Pg {page} Title.png")))
            .collect();
        let pages: Vec<&str> = pages.iter().map(String::as_str).collect();
        let archive = make_archive(temp.path(), "input.cbz", &pages);

        let report = reorganizer().reorganize(&archive, &FormatSpec::new(FORMAT), &output).unwrap();

        assert_eq!(report.chapters.len(), 3);
        let mut seen: Vec<String> =
            report.chapters.iter().flat_map(|chapter| list_entries(output.join(chapter)).unwrap()).collect();
        assert_eq!(seen.len(), pages.len());
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), pages.len());
    }

    #[test]
    fn test_interleaved_names_at_same_position_group_separately() {
        let temp = tempfile::tempdir().unwrap();
        let output = temp.path().join("output");
        fs::create_dir(&output).unwrap();
        // Two scan groups share volume 1 chapter 1, so names alternate as the
        // heap drains by page number.
        let pages: Vec<String> = (1..=12)
            .map(|page| {
                let scanner = ["Alpha", "Beta", "Gamma"][page % 3];
                format!("[{scanner}] Vol 1 Ch 1 Pg {page} Title.jpg")
            })
            .rev()
            .collect();
        let pages: Vec<&str> = pages.iter().map(String::as_str).collect();
        let archive = make_archive(temp.path(), "input.cbz", &pages);

        let mut reorganizer = reorganizer();
        let report = reorganizer.reorganize(&archive, &FormatSpec::new(FORMAT), &output).unwrap();

        let expected = [
            "Beta_Vol. 1 Ch. 1 - Title.jpg.cbz",
            "Gamma_Vol. 1 Ch. 1 - Title.jpg.cbz",
            "Alpha_Vol. 1 Ch. 1 - Title.jpg.cbz",
        ];
        assert_eq!(report.chapters, expected);
        assert_eq!(files_in(&output).len(), 3);

        let mut seen = HashSet::new();
        for (chapter, scanner) in expected.iter().zip(["Beta", "Gamma", "Alpha"]) {
            let entries = list_entries(output.join(chapter)).unwrap();
            assert_eq!(entries.len(), 4);
            for entry in entries {
                assert!(entry.starts_with(&format!("[{scanner}]")), "{entry} in {chapter}");
                assert!(seen.insert(entry), "page stored twice");
            }
        }
        assert_eq!(seen.len(), pages.len());
        let done = reorganizer.journal().lines().iter().filter(|line| line.ends_with(" - DONE!")).count();
        assert_eq!(done, pages.len());
    }

    #[test]
    fn test_reports_each_stage() {
        let temp = tempfile::tempdir().unwrap();
        let output = temp.path().join("output");
        fs::create_dir(&output).unwrap();
        let archive =
            make_archive(temp.path(), "input.cbz", &["[S] Vol 1 Ch 1 Pg 2 N.jpg", "[S] Vol 1 Ch 1 Pg 1 N.jpg"]);

        let mut progress = RecordedProgress::default();
        let mut reorganizer = reorganizer().with_progress(&mut progress);
        reorganizer.reorganize(&archive, &FormatSpec::new(FORMAT), &output).unwrap();
        drop(reorganizer);

        assert_eq!(
            progress.updates,
            vec![
                (Stage::Decompressing, 1, 2),
                (Stage::Decompressing, 2, 2),
                (Stage::Exploring, 1, 2),
                (Stage::Exploring, 2, 2),
                (Stage::Compressing, 1, 2),
                (Stage::Compressing, 2, 2),
            ]
        );
        assert_eq!(progress.finished, 1);
    }

    #[test]
    fn test_progress_finishes_when_archive_fails() {
        let temp = tempfile::tempdir().unwrap();
        let archive = make_archive(temp.path(), "input.cbz", &["cover.jpg"]);

        let mut reorganizer = reorganizer().with_progress(RecordedProgress::default());
        assert!(reorganizer.reorganize(&archive, &FormatSpec::new(FORMAT), &temp.path().join("output")).is_err());
        assert_eq!(reorganizer.progress().finished, 1);
    }

    #[test]
    fn test_duplicate_page_is_recorded_and_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let output = temp.path().join("output");
        fs::create_dir(&output).unwrap();
        let first = make_archive(temp.path(), "a.cbz", &["[S] Vol 1 Ch 1 Pg 1 N.jpg"]);
        let second = make_archive(temp.path(), "b.cbz", &["[S] Vol 1 Ch 1 Pg 1 N.jpg", "[S] Vol 1 Ch 2 Pg 1 N.jpg"]);
        let spec = FormatSpec::new(FORMAT);

        let mut reorganizer = reorganizer();
        reorganizer.reorganize(&first, &spec, &output).unwrap();
        let report = reorganizer.reorganize(&second, &spec, &output).unwrap();

        assert_eq!(report.pages, 1);
        assert_eq!(report.duplicates, vec![output.join("temp").join("[S] Vol 1 Ch 1 Pg 1 N.jpg")]);
        assert_eq!(list_entries(output.join("S_Vol. 1 Ch. 1 - N.jpg.cbz")).unwrap().len(), 1);
        assert!(output.join("S_Vol. 1 Ch. 2 - N.jpg.cbz").exists());
    }

    #[test]
    fn test_appends_to_existing_chapter_archive() {
        let temp = tempfile::tempdir().unwrap();
        let output = temp.path().join("output");
        fs::create_dir(&output).unwrap();
        let first = make_archive(temp.path(), "a.cbz", &["[S] Vol 1 Ch 1 Pg 1 N.jpg"]);
        let second = make_archive(temp.path(), "b.cbz", &["[S] Vol 1 Ch 1 Pg 2 N.jpg"]);
        let spec = FormatSpec::new(FORMAT);

        let mut reorganizer = reorganizer();
        reorganizer.reorganize(&first, &spec, &output).unwrap();
        reorganizer.reorganize(&second, &spec, &output).unwrap();

        assert_eq!(
            list_entries(output.join("S_Vol. 1 Ch. 1 - N.jpg.cbz")).unwrap(),
            vec!["[S] Vol 1 Ch 1 Pg 1 N.jpg", "[S] Vol 1 Ch 1 Pg 2 N.jpg"]
        );
    }

    #[test]
    fn test_malformed_filename_aborts_archive_and_cleans_scratch() {
        let temp = tempfile::tempdir().unwrap();
        let output = temp.path().join("output");
        fs::create_dir(&output).unwrap();
        let archive = make_archive(temp.path(), "input.cbz", &["[S] Vol 1 Ch 1 Pg 1 N.jpg", "cover.jpg"]);

        let mut reorganizer = reorganizer().with_scratch("work");
        let err = reorganizer.reorganize_inner(&archive, &FormatSpec::new(FORMAT), &output).unwrap_err();

        assert_eq!(*err, ReorganizeErrorKind::Metadata("cover.jpg".into()));
        assert!(!output.join("work").exists());
        assert!(files_in(&output).is_empty());
    }

    #[test]
    fn test_scratch_removed_after_success() {
        let temp = tempfile::tempdir().unwrap();
        let output = temp.path().join("output");
        fs::create_dir(&output).unwrap();
        let archive = make_archive(temp.path(), "input.cbz", &["[S] Vol 1 Ch 1 Pg 1 N.jpg"]);

        reorganizer().reorganize(&archive, &FormatSpec::new(FORMAT), &output).unwrap();

        assert!(!output.join("temp").exists());
        assert_eq!(files_in(&output), vec!["S_Vol. 1 Ch. 1 - N.jpg.cbz"]);
    }

    #[test]
    fn test_unreadable_archive_is_an_extract_error() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("broken.cbz");
        fs::write(&archive, "not a zip").unwrap();

        let err = reorganizer().reorganize_inner(&archive, &FormatSpec::new(FORMAT), temp.path()).unwrap_err();
        assert_eq!(*err, ReorganizeErrorKind::Extract);
    }

    #[test]
    fn test_vanished_page_is_recorded_and_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let present = temp.path().join("[S] Vol 1 Ch 1 Pg 1 N.jpg");
        fs::write(&present, "page").unwrap();
        let vanished = temp.path().join("[S] Vol 1 Ch 1 Pg 2 N.jpg");

        let mut reorganizer = reorganizer();
        let mut report = ArchiveReport::default();
        reorganizer
            .package(vec![vanished.clone(), present], &FormatSpec::new(FORMAT), temp.path(), &mut report)
            .unwrap();

        assert_eq!(report.pages, 1);
        assert_eq!(report.missing, vec![vanished.clone()]);
        assert!(reorganizer.journal().contains(&format!("No such file: {}", vanished.display())));
        assert_eq!(list_entries(temp.path().join("S_Vol. 1 Ch. 1 - N.jpg.cbz")).unwrap().len(), 1);
    }

    #[test]
    fn test_unrenderable_name_is_a_template_error() {
        let temp = tempfile::tempdir().unwrap();
        let page = temp.path().join("[S] Vol 1 Ch 1 Pg 1 N.jpg");
        fs::write(&page, "page").unwrap();

        let names: NameGenerator = "{{ name }}/{{ chapter }}.cbz".parse().unwrap();
        let mut reorganizer = Reorganizer::new(names, MemoryJournal::default());
        let err = reorganizer
            .package(vec![page], &FormatSpec::new(FORMAT), temp.path(), &mut ArchiveReport::default())
            .unwrap_err();
        assert_eq!(*err, ReorganizeErrorKind::Template);
    }
}
