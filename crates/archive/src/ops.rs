//! Archive Operations

use crate::Compression;
use crate::error::{ErrorKind, Result};
use crate::path::sanitize;
use exn::{OptionExt, ResultExt};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::instrument;
use zip::{ZipArchive, ZipWriter};

/// Returns `true` if `path` is a file holding a readable zip container.
///
/// Only the central directory is inspected; entry contents are not verified.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn is_archive(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    path.is_file() && open(path).is_ok()
}

/// Lists the names of all file entries, in the archive's own entry order.
///
/// Directory entries are omitted.
#[instrument(skip_all, fields(archive = %archive.as_ref().display(), entries))]
pub fn list_entries(archive: impl AsRef<Path>) -> Result<Vec<String>> {
    let mut reader = open(archive.as_ref())?;
    let mut entries = Vec::with_capacity(reader.len());
    for index in 0..reader.len() {
        let entry = reader.by_index_raw(index).or_raise(|| ErrorKind::InvalidData)?;
        if !entry.is_dir() {
            entries.push(entry.name().to_string());
        }
    }
    tracing::Span::current().record("entries", entries.len());
    Ok(entries)
}

/// Extracts a single entry into `dest_dir`, returning the path written.
///
/// The entry name is sanitized first (see [`sanitize_entry`](crate::sanitize_entry)),
/// so the written path is always inside `dest_dir`. Missing parent
/// directories are created.
#[instrument(skip_all, fields(archive = %archive.as_ref().display(), entry = entry))]
pub fn extract_entry(archive: impl AsRef<Path>, entry: &str, dest_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let mut reader = open(archive.as_ref())?;
    let mut file = reader.by_name(entry).or_raise(|| ErrorKind::EntryNotFound(entry.to_string()))?;
    write_entry(&mut file, entry, dest_dir.as_ref())
}

/// Extracts every file entry into `dest_dir` in a single pass over the
/// archive, returning the written paths in entry order.
///
/// Equivalent to calling [`extract_entry`] for each name returned by
/// [`list_entries`], without re-opening the archive each time.
pub fn extract_all(archive: impl AsRef<Path>, dest_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    extract_all_with(archive, dest_dir, |_, _| {})
}

/// Like [`extract_all`], calling `on_entry(done, total)` after each entry of
/// the central directory (directories included) has been handled.
#[instrument(skip_all, fields(archive = %archive.as_ref().display(), dest = %dest_dir.as_ref().display()))]
pub fn extract_all_with(
    archive: impl AsRef<Path>,
    dest_dir: impl AsRef<Path>,
    mut on_entry: impl FnMut(usize, usize),
) -> Result<Vec<PathBuf>> {
    let dest_dir = dest_dir.as_ref();
    let mut reader = open(archive.as_ref())?;
    fs::create_dir_all(dest_dir).or_raise(|| ErrorKind::Io)?;
    let total = reader.len();
    let mut extracted = Vec::with_capacity(total);
    for index in 0..total {
        let mut file = reader.by_index(index).or_raise(|| ErrorKind::InvalidData)?;
        if !file.is_dir() {
            let name = file.name().to_string();
            let path = write_entry(&mut file, &name, dest_dir)?;
            tracing::debug!(entry = %name, "Extracted");
            extracted.push(path);
        }
        on_entry(index + 1, total);
    }
    Ok(extracted)
}

/// Appends the file at `source` to `archive` under the source's basename.
///
/// The archive is created when it doesn't exist yet. Existing entries are
/// never overwritten: appending a name that is already present fails with
/// [`DuplicateEntry`](ErrorKind::DuplicateEntry). A `source` that doesn't
/// exist fails with [`MissingSource`](ErrorKind::MissingSource), which
/// callers may treat as recoverable.
#[instrument(skip_all, fields(archive = %archive.as_ref().display(), source = %source.as_ref().display(), %compression))]
pub fn append_entry(archive: impl AsRef<Path>, source: impl AsRef<Path>, compression: Compression) -> Result<()> {
    let (archive, source) = (archive.as_ref(), source.as_ref());
    if !source.is_file() {
        exn::bail!(ErrorKind::MissingSource(source.to_path_buf()));
    }
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_raise(|| ErrorKind::InvalidEntry(source.display().to_string()))?;
    let mut input = match File::open(source) {
        Ok(f) => f,
        // Removed between the check above and now.
        Err(e) if e.kind() == io::ErrorKind::NotFound => exn::bail!(ErrorKind::MissingSource(source.to_path_buf())),
        Err(e) => return Err(e).or_raise(|| ErrorKind::Io),
    };

    let mut writer = if archive.exists() {
        if open(archive)?.index_for_name(name).is_some() {
            exn::bail!(ErrorKind::DuplicateEntry(name.to_string()));
        }
        let file = OpenOptions::new().read(true).write(true).open(archive).or_raise(|| ErrorKind::Io)?;
        ZipWriter::new_append(file).or_raise(|| ErrorKind::NotAnArchive(archive.to_path_buf()))?
    } else {
        ZipWriter::new(File::create(archive).or_raise(|| ErrorKind::Io)?)
    };
    writer.start_file(name, compression.file_options()).or_raise(|| ErrorKind::Io)?;
    io::copy(&mut input, &mut writer).or_raise(|| ErrorKind::Io)?;
    writer.finish().or_raise(|| ErrorKind::Io)?;
    tracing::debug!(entry = name, "Appended");
    Ok(())
}

fn open(path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
        Err(e) => return Err(e).or_raise(|| ErrorKind::Io),
    };
    ZipArchive::new(BufReader::new(file)).or_raise(|| ErrorKind::NotAnArchive(path.to_path_buf()))
}

fn write_entry(entry: &mut impl Read, name: &str, dest_dir: &Path) -> Result<PathBuf> {
    let target = dest_dir.join(sanitize(name)?);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
    }
    let mut output = File::create(&target).or_raise(|| ErrorKind::Io)?;
    io::copy(entry, &mut output).or_raise(|| ErrorKind::InvalidData)?;
    Ok(target)
}
