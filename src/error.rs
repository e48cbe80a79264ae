//! Error types for pdf-indexer.

use std::io;
use thiserror::Error;

/// Result type alias for pdf-indexer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building an index.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure or page content.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// A search term could not be turned into a matcher.
    #[error("Invalid search term {0:?}: {1}")]
    InvalidTerm(String, String),

    /// A required input (document or term specification) was not supplied.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// Error while rendering the index (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::PdfParse(err.to_string())
    }
}
