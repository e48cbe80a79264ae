//! PDF format detection.
//!
//! Uploaded bytes are checked for the `%PDF-x.y` header before they are
//! handed to the PDF backend, so that obviously wrong inputs fail fast with
//! [`Error::UnknownFormat`] instead of an opaque parser error.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Detect PDF format from a file path.
///
/// # Example
/// ```no_run
/// use pdf_indexer::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("book.pdf").unwrap();
/// println!("PDF version: {}", format.version);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 16];
    let read = reader.read(&mut header)?;
    detect_format_from_bytes(&header[..read])
}

/// Detect PDF format from the leading bytes of a document.
///
/// Returns [`Error::UnknownFormat`] when the magic bytes are missing and
/// [`Error::UnsupportedVersion`] when the version is not of the form `d.d`.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfFormat { version })
}

fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
