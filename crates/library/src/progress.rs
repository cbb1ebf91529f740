//! Per-archive progress reporting.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// The phases every input archive goes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Unpacking the input archive into the scratch directory.
    Decompressing,
    /// Reading page metadata from the extracted filenames.
    Exploring,
    /// Appending pages to their chapter archives.
    Compressing,
}
impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Decompressing => "Decompressing",
            Self::Exploring => "Exploring files",
            Self::Compressing => "Compressing",
        })
    }
}

/// Receives progress while a [`Reorganizer`](crate::Reorganizer) works
/// through an archive.
pub trait Progress {
    /// `done` of `total` units of `stage` are complete.
    fn update(&mut self, stage: Stage, done: usize, total: usize);

    /// The current archive is finished, successfully or not.
    fn finish(&mut self) {}
}
impl<P: Progress + ?Sized> Progress for &mut P {
    fn update(&mut self, stage: Stage, done: usize, total: usize) {
        (**self).update(stage, done, total);
    }

    fn finish(&mut self) {
        (**self).finish();
    }
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;
impl Progress for NoProgress {
    fn update(&mut self, _stage: Stage, _done: usize, _total: usize) {}
}
