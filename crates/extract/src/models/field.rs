use std::fmt::{Display, Formatter, Result as FmtResult};

/// The closed set of fields a [`FormatSpec`](crate::FormatSpec) can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Scanner,
    Volume,
    Chapter,
    Page,
    Name,
}
impl Field {
    /// Fields that must be populated for extraction to succeed.
    pub const REQUIRED: [Field; 4] = [Field::Volume, Field::Chapter, Field::Page, Field::Name];

    /// Looks up a field by the name used in format strings. Names are
    /// case-sensitive, as they are in the format string itself.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "scanner" => Self::Scanner,
            "volume" => Self::Volume,
            "chapter" => Self::Chapter,
            "page" => Self::Page,
            "name" => Self::Name,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scanner => "scanner",
            Self::Volume => "volume",
            Self::Chapter => "chapter",
            Self::Page => "page",
            Self::Name => "name",
        }
    }

    /// Returns `true` for the fields parsed as integers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Volume | Self::Chapter | Self::Page)
    }
}
impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
