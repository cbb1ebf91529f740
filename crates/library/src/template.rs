//! Output archive naming.
//!
//! Converts page [`Metadata`] into the filename of the chapter archive the
//! page belongs to, using a user-configured [upon] template. The template
//! syntax follows upon's Mustache-like conventions (`{{ variable }}`,
//! `{{ value|formatter }}`), extended with two helpers:
//!
//! - **`slug`** - Converts strings to URL-safe slugs, stripping quotation marks
//!   first to avoid artifacts like leading/trailing hyphens.
//! - **`truncate`** - Truncates strings to a maximum byte length at a character
//!   boundary, usable as either `truncate(value, n)` or `{{ value|truncate: n }}`.
//!
//! # Template Variables
//!
//! | Variable  | Type             | Description                           |
//! |-----------|------------------|---------------------------------------|
//! | `scanner` | `Option<String>` | Scan group; unset when none was found |
//! | `volume`  | `u64`            | Volume number                         |
//! | `chapter` | `u64`            | Chapter number                        |
//! | `page`    | `u64`            | Page number within the chapter        |
//! | `name`    | `String`         | Series or chapter title               |
//!
//! Pages rendering to the same name end up in the same archive, so templates
//! should not reference `page`.
//!
//! # Example
//!
//! ```
//! use rechapter_extract::models::Metadata;
//! use rechapter_library::NameGenerator;
//!
//! let metadata = Metadata {
//!     scanner: "TeamX".into(),
//!     volume: 1,
//!     chapter: 5,
//!     page: 12,
//!     name: "Intro".into(),
//! };
//! let names = NameGenerator::default_template().unwrap();
//! assert_eq!(names.generate(&metadata).unwrap(), "TeamX_Vol. 1 Ch. 5 - Intro.cbz");
//!
//! let names: NameGenerator = "{{ name|slug }}-c{{ chapter }}.cbz".parse().unwrap();
//! assert_eq!(names.generate(&metadata).unwrap(), "intro-c5.cbz");
//! ```

use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use rechapter_archive::sanitize_entry;
use rechapter_extract::models::Metadata;
use std::path::Component;
use std::str::FromStr;
use tracing::instrument;
use upon::{Engine, Template};

/// Names chapter archives `<scanner>_Vol. <volume> Ch. <chapter> - <name>.cbz`,
/// leaving out the scanner prefix when there is none.
pub const DEFAULT_TEMPLATE: &str =
    "{% if scanner %}{{ scanner }}_{% endif %}Vol. {{ volume }} Ch. {{ chapter }} - {{ name }}.cbz";

/// Generates chapter archive filenames from page [`Metadata`] and a
/// user-defined template string.
///
/// Constructed via [`FromStr`], which compiles the template eagerly so that
/// syntax errors surface at creation time rather than at render time. The
/// compiled template is reusable across many [`generate`](Self::generate) calls.
pub struct NameGenerator {
    engine: Engine<'static>,
    template: Template<'static>,
}
impl FromStr for NameGenerator {
    type Err = Error;

    /// Compiles the given template string into a reusable [`NameGenerator`].
    ///
    /// Registers the `slug` formatter and `truncate` function before compiling,
    /// so both are available in the template. Returns [`ErrorKind::Template`] if
    /// the template syntax is invalid.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        let template = engine.compile(s.to_string()).or_raise(|| ErrorKind::Template)?;
        Ok(Self { engine, template })
    }
}
impl NameGenerator {
    /// Compiles `template`, falling back to [`DEFAULT_TEMPLATE`] when `None`.
    pub fn new(template: Option<&str>) -> Result<Self> {
        template.unwrap_or(DEFAULT_TEMPLATE).parse()
    }

    pub fn default_template() -> Result<Self> {
        DEFAULT_TEMPLATE.parse()
    }

    /// Renders the archive filename for the chapter `metadata` belongs to.
    ///
    /// The result is trimmed and must be a single, plain filename: anything
    /// containing a path separator or naming a parent directory is rejected
    /// with [`ErrorKind::Template`].
    #[instrument(skip_all, fields(volume = metadata.volume, chapter = metadata.chapter))]
    pub fn generate(&self, metadata: &Metadata) -> Result<String> {
        let name = self
            .template
            .render(&self.engine, Self::parameters(metadata))
            .to_string()
            .or_raise(|| ErrorKind::Template)?;
        Self::normalize(name)
    }

    /// Trims the rendered name and checks it stays a single path component.
    fn normalize(name: String) -> Result<String> {
        let name = name.trim();
        let path = sanitize_entry(name).or_raise(|| ErrorKind::Template)?;
        let mut components = path.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(single)), None) if single == name => Ok(name.to_string()),
            _ => {
                tracing::debug!(name, "Rendered archive name is not a plain filename");
                exn::bail!(ErrorKind::Template)
            },
        }
    }

    fn parameters(metadata: &Metadata) -> upon::Value {
        let scanner = Some(metadata.scanner.clone()).filter(|scanner| !scanner.is_empty());
        upon::value! {
            scanner: scanner,
            volume: metadata.volume,
            chapter: metadata.chapter,
            page: metadata.page,
            name: metadata.name.clone(),
        }
    }
}

/// Custom [`upon`] extensions for filename-safe string manipulation.
mod addons {
    use rslug::slugify;
    use std::fmt::Write;
    use upon::{Engine, Value, fmt as upon_fmt};

    /// Formats strings as URL-safe slugs, dropping quotation marks first so
    /// `"hello"` doesn't become `-hello-`.
    fn slug_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => {
                // Various quotation marks: '"''""„"`«»
                let marks = [
                    '\u{0027}', '\u{0022}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{201E}', '\u{201B}',
                    '\u{0060}', '\u{00AB}', '\u{00BB}', '\u{2039}', '\u{203A}',
                ];
                let stripped: String = s.chars().filter(|c| !marks.contains(c)).collect();
                write!(f, "{}", slugify!(&stripped))?
            },
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> String {
        s[..s.floor_char_boundary(max_bytes)].to_string()
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_formatter("slug", slug_formatter);
        engine.add_function("truncate", truncate_to_char_boundary);
    }
}
