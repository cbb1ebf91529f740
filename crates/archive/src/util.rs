use crate::Compression;
use std::fmt::{Display, Formatter, Result as FmtResult};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

// Deflate's highest level; storage space wins over speed.
const DEFLATE_LEVEL: i64 = 9;

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for Compression {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl Compression {
    /// Returns the short name for configuration (for displaying to user)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::Stored => "stored",
            Compression::Deflated => "deflate",
        }
    }

    /// Zip entry options for files appended with this compression.
    #[must_use]
    pub(crate) fn file_options(&self) -> SimpleFileOptions {
        let options = SimpleFileOptions::default();
        match self {
            Compression::Stored => options.compression_method(CompressionMethod::Stored),
            Compression::Deflated => options
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(DEFLATE_LEVEL)),
        }
    }
}
