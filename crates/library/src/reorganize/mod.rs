//! Regrouping page archives into chapter archives.
//!
//! A [`Reorganizer`] owns everything a run needs besides its inputs: the
//! [`NameGenerator`] deciding which chapter archive a page lands in, the
//! [`Compression`] used for output entries, the name of the scratch
//! directory, the [`Journal`] receiving a record of the run and the
//! [`Progress`] sink receiving per-stage counts.
//!
//! The primary entry point is [`Reorganizer::run`], which resolves a source
//! path into input archives, resets the destination and passes each archive
//! to [`Reorganizer::reorganize`]. A failing archive is recorded in the
//! [`RunReport`] and the run moves on to the next one.

mod archive;
mod batch;
pub mod error;
mod record;

pub use self::archive::ArchiveReport;
pub use self::batch::{Failure, RunReport};
pub use self::record::PageRecord;
use crate::journal::Journal;
use crate::progress::{NoProgress, Progress};
use crate::template::NameGenerator;
use rechapter_archive::Compression;

/// Name of the scratch directory created inside the output directory.
pub const DEFAULT_SCRATCH: &str = "temp";

pub struct Reorganizer<J, P = NoProgress> {
    names: NameGenerator,
    compression: Compression,
    scratch: String,
    journal: J,
    progress: P,
}
impl<J: Journal> Reorganizer<J> {
    pub fn new(names: NameGenerator, journal: J) -> Self {
        Self {
            names,
            compression: Compression::default(),
            scratch: DEFAULT_SCRATCH.to_string(),
            journal,
            progress: NoProgress,
        }
    }
}
impl<J: Journal, P: Progress> Reorganizer<J, P> {
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the scratch directory name. It is always resolved inside the
    /// output directory and must be a single path component.
    pub fn with_scratch(mut self, scratch: impl Into<String>) -> Self {
        self.scratch = scratch.into();
        self
    }

    /// Replaces the progress sink.
    pub fn with_progress<Q: Progress>(self, progress: Q) -> Reorganizer<J, Q> {
        Reorganizer {
            names: self.names,
            compression: self.compression,
            scratch: self.scratch,
            journal: self.journal,
            progress,
        }
    }

    pub fn journal(&self) -> &J {
        &self.journal
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    pub fn into_journal(self) -> J {
        self.journal
    }
}
