//! Page metadata extraction from filenames.
//!
//! A [`FormatSpec`] describes how a page's filename encodes its position in
//! a series. It is written as a `|`-separated list of tokens:
//!
//! | Token       | Example     | Meaning                                                   |
//! |-------------|-------------|-----------------------------------------------------------|
//! | `[field]`   | `[chapter]` | Capture a `[bracketed group]` (or a single bare lexeme)    |
//! | `loopText`  | `loopCh`    | Skip lexemes up to and including the lexeme `Ch`          |
//! | anything    | `page`      | Consume exactly one lexeme, stored under the token's text |
//!
//! Recognised fields are `scanner`, `volume`, `chapter`, `page` and `name`;
//! everything else is consumed and discarded.
//!
//! # Example
//!
//! ```
//! use rechapter_extract::{FormatSpec, extract};
//!
//! let spec: FormatSpec = "[scanner]|loopVol|[volume]|loopCh|[chapter]|loopPg|[page]|[name]".parse().unwrap();
//! let metadata = extract("[TeamX] Vol 01 Ch 005 Pg 12 Intro.jpg", &spec).unwrap();
//! assert_eq!(metadata.scanner, "TeamX");
//! assert_eq!((metadata.volume, metadata.chapter, metadata.page), (1, 5, 12));
//! assert_eq!(metadata.name, "Intro.jpg");
//! ```

mod compare;
pub mod error;
mod extractor;
mod format;
pub mod models;

use crate::error::Result;
pub use crate::extractor::clean_numeric;
pub use crate::format::{CLOSE_MARKER, FormatSpec, LOOP_PREFIX, OPEN_MARKER, SEPARATOR, Token};
use crate::models::Metadata;

/// Easy, top-level entrypoint for extracting [`Metadata`] from a filename.
///
/// The filename must be a basename; directory components are not stripped
/// here. See [`FormatSpec::extract`] for the matching rules.
pub fn extract(filename: &str, spec: &FormatSpec) -> Result<Metadata> {
    spec.extract(filename)
}
