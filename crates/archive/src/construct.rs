use crate::Compression;
use crate::error::{Error, ErrorKind};
use std::str::FromStr;

impl FromStr for Compression {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "store" | "stored" => Ok(Compression::Stored),
            "deflate" | "deflated" | "zip" => Ok(Compression::Deflated),
            _ => exn::bail!(ErrorKind::UnsupportedCompression(s.to_string())),
        }
    }
}
