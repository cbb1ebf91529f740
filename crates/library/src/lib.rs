//! Regroups page archives into one archive per chapter.
//!
//! Every page inside an input archive is decomposed into
//! [`Metadata`](rechapter_extract::models::Metadata) by a
//! [`FormatSpec`](rechapter_extract::FormatSpec), drained in reading order,
//! and appended to the output archive whose name a [`NameGenerator`] renders
//! for it. Progress is written to a [`Journal`] and reported to a
//! [`Progress`] sink.

pub mod error;
mod journal;
mod progress;
pub mod reorganize;
mod template;

pub use crate::journal::{FileJournal, Journal, MemoryJournal};
pub use crate::progress::{NoProgress, Progress, Stage};
pub use crate::reorganize::{ArchiveReport, DEFAULT_SCRATCH, Failure, Reorganizer, RunReport};
pub use crate::template::{DEFAULT_TEMPLATE, NameGenerator};
