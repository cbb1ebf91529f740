//! Compression CLI Helpers

use crate::Compression;
use crate::error::Error;
use std::str::FromStr;

/// Shape of an optional flag with an optional value, e.g. `--compression[=FORMAT]`.
pub type Flag = Option<Option<String>>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Preference {
    /// Compression format was specified on the command-line
    Explicit(Compression),
    /// Compression flag was enabled on the command-line, but no format was specified
    Implicit,
    /// Compression was omitted from the command-line
    NotSpecified,
}
impl TryFrom<Flag> for Preference {
    type Error = Error;
    fn try_from(value: Flag) -> Result<Self, Self::Error> {
        match value {
            Some(Some(s)) if s.is_empty() => Ok(Self::Implicit),
            Some(Some(s)) => Ok(Self::Explicit(Compression::from_str(&s)?)),
            Some(None) => Ok(Self::Implicit),
            None => Ok(Self::NotSpecified),
        }
    }
}
impl Preference {
    /// A bare flag turns compression on, overriding a configured `stored`;
    /// without the flag the configured format applies.
    pub fn resolve(&self, configured: Compression) -> Compression {
        match self {
            Self::Explicit(c) => *c,
            Self::Implicit => Compression::Deflated,
            Self::NotSpecified => configured,
        }
    }
}
