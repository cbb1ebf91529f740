//! Applying a [`FormatSpec`] to a filename.

use crate::error::{ErrorKind, Result};
use crate::format::{CLOSE_MARKER, FormatSpec, OPEN_MARKER, Token};
use crate::models::{Field, Metadata};
use exn::OptionExt;
use std::collections::HashMap;
use tracing::instrument;

/// Trims non-numeric characters from both ends of `value` until both ends are
/// numeric (or nothing is left). Interior characters are untouched.
///
/// Any Unicode numeric character counts, so fullwidth digits such as `１２`
/// survive; whether they parse as a decimal number is decided afterwards.
///
/// ```
/// use rechapter_extract::clean_numeric;
/// assert_eq!(clean_numeric("Ch005."), "005");
/// assert_eq!(clean_numeric("---"), "");
/// assert_eq!(clean_numeric("12a34"), "12a34");
/// assert_eq!(clean_numeric("v１２"), "１２");
/// ```
pub fn clean_numeric(value: &str) -> &str {
    value.trim_matches(|c: char| !c.is_numeric())
}

// Code points of `0` in the decimal digit blocks seen in scan filenames.
const DIGIT_ZEROS: [u32; 6] = [
    0x0660, // Arabic-Indic
    0x06F0, // Extended Arabic-Indic
    0x0966, // Devanagari
    0x09E6, // Bengali
    0x0E50, // Thai
    0xFF10, // Fullwidth
];

/// Parses a cleaned numeric value, accepting ASCII and the decimal digit
/// blocks in [`DIGIT_ZEROS`]. Other numeric characters (`²`, `Ⅻ`) fail.
fn decimal_value(digits: &str) -> Option<u64> {
    digits.chars().try_fold(0u64, |total, c| {
        let digit = c.to_digit(10).or_else(|| {
            let code = u32::from(c);
            DIGIT_ZEROS.iter().find(|&&zero| (zero..zero + 10).contains(&code)).map(|zero| code - zero)
        })?;
        total.checked_mul(10)?.checked_add(u64::from(digit))
    })
}

/// Captured text keyed by recognised field.
#[derive(Debug, Default)]
struct Captures {
    values: HashMap<Field, String>,
}
impl Captures {
    fn append(&mut self, field: Field, text: &str, separator: &str) {
        let value = self.values.entry(field).or_default();
        if !value.is_empty() {
            value.push_str(separator);
        }
        value.push_str(text);
    }

    fn required(&self, field: Field) -> Result<&str> {
        self.values.get(&field).map(String::as_str).ok_or_raise(|| ErrorKind::MissingField(field.as_str()))
    }

    fn numeric(&self, field: Field) -> Result<u64> {
        debug_assert!(field.is_numeric());
        let raw = self.required(field)?;
        match clean_numeric(raw) {
            "" => Ok(0),
            digits => decimal_value(digits).ok_or_raise(|| ErrorKind::ParseError {
                field: field.as_str(),
                value: raw.to_string(),
            }),
        }
    }
}

impl FormatSpec {
    /// Decomposes `filename` into [`Metadata`] according to this format.
    ///
    /// The filename is trimmed and split on single spaces into lexemes; tokens
    /// are applied in order against a cursor over those lexemes. Tokens left
    /// over once the lexemes run out are ignored. Afterwards `volume`,
    /// `chapter` and `page` are cleaned with [`clean_numeric`] and parsed (an
    /// empty value parses as `0`).
    ///
    /// # Errors
    ///
    /// Fails with an [`ErrorKind`] describing the mismatch when a capture is
    /// malformed, a skip target never appears, a required field is never
    /// populated, or a numeric field isn't a number.
    #[instrument(skip(self), fields(format = %self))]
    pub fn extract(&self, filename: &str) -> Result<Metadata> {
        tracing::trace!(tokens = ?self.tokens(), "Detected format");
        let lexemes: Vec<&str> = filename.trim().split(' ').collect();
        tracing::trace!(?lexemes, "Detected lexemes");

        let mut captures = Captures::default();
        let mut cursor = 0;
        for token in self.tokens() {
            if cursor >= lexemes.len() {
                break;
            }
            match token {
                Token::Literal(_) => {
                    if let Some(field) = token.field() {
                        captures.append(field, lexemes[cursor], "");
                    }
                    cursor += 1;
                },
                Token::Capture(name) => {
                    let (text, next) = capture(&lexemes, cursor, name)?;
                    if let Some(field) = token.field() {
                        captures.append(field, &text, " ");
                    }
                    cursor = next;
                },
                Token::SkipUntil(target) => {
                    let offset = lexemes[cursor..]
                        .iter()
                        .position(|lexeme| lexeme == target)
                        .ok_or_raise(|| ErrorKind::SkipTargetNotFound(target.clone()))?;
                    cursor += offset + 1;
                },
            }
        }

        for field in Field::REQUIRED {
            captures.required(field)?;
        }
        Ok(Metadata {
            volume: captures.numeric(Field::Volume)?,
            chapter: captures.numeric(Field::Chapter)?,
            page: captures.numeric(Field::Page)?,
            name: captures.required(Field::Name)?.to_string(),
            scanner: captures.values.remove(&Field::Scanner).unwrap_or_default(),
        })
    }
}

/// Reads one capture starting at `start`, returning the captured text and the
/// cursor position after it.
///
/// A lexeme opening with [`OPEN_MARKER`] starts a group that runs until (and
/// including) the first lexeme ending with [`CLOSE_MARKER`]; the lexemes are
/// joined with single spaces and the two markers stripped. A bare lexeme is
/// captured on its own.
fn capture(lexemes: &[&str], start: usize, field: &str) -> Result<(String, usize)> {
    let first = lexemes[start];
    if !first.starts_with(OPEN_MARKER) {
        if first.ends_with(CLOSE_MARKER) {
            exn::bail!(ErrorKind::MissingOpeningMarker {
                field: field.to_string(),
                lexeme: first.to_string(),
            });
        }
        return Ok((first.to_string(), start + 1));
    }
    let length = lexemes[start..]
        .iter()
        .position(|lexeme| lexeme.ends_with(CLOSE_MARKER))
        .ok_or_raise(|| ErrorKind::UnterminatedCapture(field.to_string()))?
        + 1;
    let joined = lexemes[start..start + length].join(" ");
    let text = joined.strip_prefix(OPEN_MARKER).and_then(|s| s.strip_suffix(CLOSE_MARKER)).unwrap_or_default();
    Ok((text.to_string(), start + length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FULL: &str = "[scanner]|loopVol|[volume]|loopCh|[chapter]|loopPg|[page]|[name]";

    fn extract(pattern: &str, filename: &str) -> Result<Metadata> {
        FormatSpec::new(pattern).extract(filename)
    }

    #[rstest]
    #[case("Ch005.", "005")]
    #[case("---", "")]
    #[case("", "")]
    #[case("12a34", "12a34")]
    #[case("v01", "01")]
    #[case("(12)", "12")]
    #[case("7", "7")]
    #[case("v１２", "１２")]
    #[case("Ch٣.", "٣")]
    fn test_clean_numeric(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(clean_numeric(input), expected);
    }

    #[test]
    fn test_bare_lexemes_after_skip_markers() {
        let metadata = extract(FULL, "[TeamX] Vol 01 Ch 005 Pg 12 Intro.jpg").unwrap();
        assert_eq!(
            metadata,
            Metadata {
                scanner: "TeamX".into(),
                volume: 1,
                chapter: 5,
                page: 12,
                name: "Intro.jpg".into(),
            }
        );
    }

    #[test]
    fn test_bracketed_groups_after_skip_markers() {
        let metadata = extract(FULL, "[Team X] Vol [01] Ch [005] Pg [12] [One Piece.jpg]").unwrap();
        assert_eq!(metadata.scanner, "Team X");
        assert_eq!(metadata.position(), (1, 5, 12));
        assert_eq!(metadata.name, "One Piece.jpg");
    }

    #[test]
    fn test_unicode_decimal_digits() {
        let metadata = extract("name|volume|chapter|page", "Title v１２ c３ p４.jpg").unwrap();
        assert_eq!(metadata.position(), (12, 3, 4));
        let metadata = extract("name|volume|chapter|page", "Title ٠١ ٢ ٣").unwrap();
        assert_eq!(metadata.position(), (1, 2, 3));
    }

    #[rstest]
    #[case("42", Some(42))]
    #[case("００７", Some(7))]
    #[case("1２3", Some(123))]
    #[case("²", None)]
    #[case("Ⅻ", None)]
    #[case("12a34", None)]
    #[case("99999999999999999999999", None)]
    fn test_decimal_value(#[case] digits: &str, #[case] expected: Option<u64>) {
        assert_eq!(decimal_value(digits), expected);
    }

    #[test]
    fn test_literal_tokens_consume_one_lexeme() {
        let metadata = extract("name|volume|chapter|page", "Berserk v02 c010 p03.png").unwrap();
        assert_eq!(metadata.name, "Berserk");
        assert_eq!(metadata.position(), (2, 10, 3));
        assert_eq!(metadata.scanner, "");
    }

    #[test]
    fn test_unrecognised_keys_are_consumed_and_discarded() {
        let metadata = extract("[name]|Vol|volume|[junk]|chapter|page", "[Blame!] Vol. 3 [raw scan] 7 12.png").unwrap();
        assert_eq!(metadata.name, "Blame!");
        assert_eq!(metadata.position(), (3, 7, 12));
    }

    #[test]
    fn test_repeated_captures_append_with_space() {
        let metadata = extract("[name]|[name]|volume|chapter|page", "[Hunter x] [Hunter] 1 2 3.jpg").unwrap();
        assert_eq!(metadata.name, "Hunter x Hunter");
    }

    #[test]
    fn test_repeated_literals_concatenate() {
        let metadata = extract("volume|chapter|chapter|page|name", "1 1 0 4 Name").unwrap();
        assert_eq!(metadata.chapter, 10);
    }

    #[test]
    fn test_empty_numeric_is_zero() {
        let metadata = extract("name|volume|chapter|page", "Oneshot --- Ch. 5").unwrap();
        assert_eq!(metadata.position(), (0, 0, 5));
    }

    #[test]
    fn test_trailing_tokens_ignored_when_lexemes_run_out() {
        let metadata = extract("volume|chapter|page|name|[scanner]|loopNever", "1 2 3 Name").unwrap();
        assert_eq!(metadata.name, "Name");
        assert_eq!(metadata.scanner, "");
    }

    #[test]
    fn test_filename_is_trimmed() {
        let metadata = extract("volume|chapter|page|name", "  1 2 3 Name\n").unwrap();
        assert_eq!(metadata.name, "Name");
    }

    #[rstest]
    #[case("[name]|volume|chapter|page", "[Unclosed 1 2 3", ErrorKind::UnterminatedCapture("name".into()))]
    #[case(
        "[volume]|chapter|page|name",
        "01] 2 3 Name",
        ErrorKind::MissingOpeningMarker { field: "volume".into(), lexeme: "01]".into() }
    )]
    #[case("loopVol|volume|chapter|page|name", "1 2 3 Name", ErrorKind::SkipTargetNotFound("Vol".into()))]
    #[case("volume|chapter|page", "1 2 3", ErrorKind::MissingField("name"))]
    #[case("volume|chapter|page|name", "1 2", ErrorKind::MissingField("page"))]
    #[case("volume|chapter|page", "x1y2 2 3", ErrorKind::MissingField("name"))]
    #[case(
        "volume|chapter|page|name",
        "1 2a3 4 Name",
        ErrorKind::ParseError { field: "chapter", value: "2a3".into() }
    )]
    #[case(
        "volume|chapter|page|name",
        "v² 2 3 Name",
        ErrorKind::ParseError { field: "volume", value: "v²".into() }
    )]
    #[case("volume|chapter|page|name", "1 Ⅻ 3 Name", ErrorKind::ParseError { field: "chapter", value: "Ⅻ".into() })]
    fn test_malformed_filenames(#[case] pattern: &str, #[case] filename: &str, #[case] expected: ErrorKind) {
        let err = extract(pattern, filename).unwrap_err();
        assert_eq!(*err, expected);
    }
}
