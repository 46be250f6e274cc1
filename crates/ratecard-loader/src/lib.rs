//! Listing file loader.
//!
//! Reads a free-form card listing from disk and hands its text to the
//! parser. A missing file and a zero-byte file are distinct fatal errors;
//! undecodable bytes are not fatal.
//!
//! # Example
//!
//! ```ignore
//! use ratecard_loader::load;
//! use std::path::Path;
//!
//! let listing = load(Path::new("tempcards.txt"))?;
//! let cards = ratecard_parser::parse_listing(&listing.text);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Errors that can occur during loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The listing file does not exist.
    #[error("file not found: {}", .path.display())]
    Missing {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The listing file exists but has zero bytes.
    #[error("file is empty (0 bytes): {}", .path.display())]
    Empty {
        /// The empty file.
        path: PathBuf,
    },

    /// IO error reading a file.
    #[error("failed to read file {}: {source}", .path.display())]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// A hint for the user on how to recover.
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "make sure the listing file exists in the project root",
            Self::Empty { .. } => {
                "the file appears to be unsaved in your editor; save it first, then run again"
            }
            Self::Io { .. } => "check the file permissions",
        }
    }
}

/// How the listing bytes were decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Plain UTF-8.
    Utf8,
    /// UTF-8 with a leading byte-order mark, which was removed.
    Utf8Bom,
    /// Invalid UTF-8; bad sequences were replaced with U+FFFD.
    Utf8Lossy,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Bom => "utf-8-sig",
            Self::Utf8Lossy => "utf-8 (lossy)",
        };
        f.write_str(name)
    }
}

/// A loaded listing.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Where the listing was read from.
    pub path: PathBuf,
    /// Decoded text.
    pub text: String,
    /// Decoding that succeeded.
    pub encoding: Encoding,
    /// Size of the file in bytes.
    pub size: u64,
}

impl Listing {
    /// Whether the listing has no non-whitespace content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Load a listing file.
pub fn load(path: &Path) -> Result<Listing, LoadError> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::Missing {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    if bytes.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let size = bytes.len() as u64;
    let (text, encoding) = decode(bytes);
    if encoding == Encoding::Utf8Lossy {
        warn!(path = %path.display(), "listing is not valid UTF-8; invalid bytes were replaced");
    }
    info!(path = %path.display(), size, %encoding, "loaded listing");

    Ok(Listing {
        path: path.to_path_buf(),
        text,
        encoding,
        size,
    })
}

/// Decode listing bytes, tolerating a byte-order mark and invalid UTF-8.
#[must_use]
pub fn decode(bytes: Vec<u8>) -> (String, Encoding) {
    let (bytes, encoding) = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => (rest.to_vec(), Encoding::Utf8Bom),
        None => (bytes, Encoding::Utf8),
    };
    match String::from_utf8(bytes) {
        Ok(text) => (text, encoding),
        Err(err) => (
            String::from_utf8_lossy(err.as_bytes()).into_owned(),
            Encoding::Utf8Lossy,
        ),
    }
}
