//! Format specification parsing.

use crate::models::Field;
use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Separates tokens in a format string.
pub const SEPARATOR: char = '|';
/// Reserved prefix marking a [`Token::SkipUntil`].
pub const LOOP_PREFIX: &str = "loop";
/// Opens a multi-lexeme capture, in both format strings and filenames.
pub const OPEN_MARKER: char = '[';
/// Closes a multi-lexeme capture, in both format strings and filenames.
pub const CLOSE_MARKER: char = ']';

/// A single instruction of a [`FormatSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Consumes exactly one lexeme, stored under the token's own text.
    Literal(String),
    /// Consumes a `[bracketed group]` of lexemes (or one bare lexeme) into the
    /// named field.
    Capture(String),
    /// Skips lexemes up to and including the first one equal to the target.
    SkipUntil(String),
}
impl Token {
    fn parse(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix(OPEN_MARKER) {
            return Self::Capture(rest.strip_suffix(CLOSE_MARKER).unwrap_or(rest).to_string());
        }
        if let Some(target) = raw.strip_prefix(LOOP_PREFIX) {
            return Self::SkipUntil(target.to_string());
        }
        Self::Literal(raw.to_string())
    }

    /// The recognised field this token populates, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::Literal(key) | Self::Capture(key) => Field::from_name(key),
            Self::SkipUntil(_) => None,
        }
    }
}
impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Literal(text) => write!(f, "{text}"),
            Self::Capture(name) => write!(f, "{OPEN_MARKER}{name}{CLOSE_MARKER}"),
            Self::SkipUntil(target) => write!(f, "{LOOP_PREFIX}{target}"),
        }
    }
}

/// An ordered list of [`Token`]s describing how a filename decomposes into
/// [`Metadata`](crate::models::Metadata) fields.
///
/// Parsing never fails: a format is only checked against real filenames, in
/// [`extract`](Self::extract). The [`Display`] implementation renders the
/// canonical format string back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatSpec {
    tokens: Vec<Token>,
}
impl FormatSpec {
    pub fn new(pattern: &str) -> Self {
        let tokens = pattern.trim().split(SEPARATOR).map(Token::parse).collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}
impl FromStr for FormatSpec {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
impl From<&str> for FormatSpec {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
impl Display for FormatSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}
