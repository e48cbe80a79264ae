//! # pdf-indexer
//!
//! Back-of-book index generation for PDF documents.
//!
//! Given a PDF and a list of search terms, optionally grouped under a
//! label with synonyms, this library finds the pages on which each label's
//! terms occur in the body text (running heads excluded) and produces
//! index lines such as `Fire - 1-3, 5`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_indexer::{index_file, IndexOutcome};
//!
//! fn main() -> pdf_indexer::Result<()> {
//!     let terms = "Arcadia (Arcadians) = Arcadia, Arcadians\nLight";
//!
//!     match index_file("book.pdf", terms)? {
//!         IndexOutcome::Found(index) => println!("{}", index.to_text()),
//!         IndexOutcome::NoMatches => eprintln!("None of the terms were found in the PDF."),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Term specifications
//!
//! One entry per line:
//!
//! - `Label = term1, term2` indexes `Label` wherever any of the terms occurs
//! - `Term` indexes `Term` under its own name
//!
//! Matching is literal, case-insensitive and whole-word.
//!
//! ## Pipeline
//!
//! - [`parse_terms`] turns the raw specification into a [`TermMap`]
//! - [`PdfParser`] yields positioned [`PageBlock`]s per page
//! - [`extract_body_text`] drops blocks inside the header band
//! - [`TermMatcher`] finds the pages for each label
//! - [`collapse_ranges`] and [`build_index`] produce the final lines

pub mod detect;
pub mod error;
pub mod index;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result};
pub use index::{
    build_index, collapse_ranges, extract_body_text, match_terms, parse_terms, TermMatcher,
};
pub use model::{BBox, Index, IndexEntry, IndexOutcome, MatchResult, PageBlock, TermMap};
pub use parser::{
    ErrorMode, IndexOptions, PageSelection, PageSource, PdfParser, DEFAULT_HEADER_THRESHOLD,
};
pub use render::{to_json, to_text, JsonFormat};

use std::io::Read;
use std::path::Path;

/// Index a PDF file.
///
/// # Arguments
///
/// * `path` - Path to the PDF file
/// * `terms` - Raw term specifications, one per line
///
/// # Example
///
/// ```no_run
/// let outcome = pdf_indexer::index_file("book.pdf", "Fire = fire, flame").unwrap();
/// if let Some(index) = outcome.index() {
///     println!("{}", index.to_text());
/// }
/// ```
pub fn index_file<P: AsRef<Path>>(path: P, terms: &str) -> Result<IndexOutcome> {
    index_file_with_options(path, terms, IndexOptions::default())
}

/// Index a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdf_indexer::{index_file_with_options, IndexOptions};
///
/// let options = IndexOptions::new().with_header_threshold(60.0).lenient();
/// let outcome = index_file_with_options("book.pdf", "Light", options).unwrap();
/// ```
pub fn index_file_with_options<P: AsRef<Path>>(
    path: P,
    terms: &str,
    options: IndexOptions,
) -> Result<IndexOutcome> {
    let terms = require_terms(terms)?;
    let parser = PdfParser::open_with_options(path, options)?;
    build_index(&parser, &terms, parser.options())
}

/// Index a PDF held in memory.
///
/// Empty `data` or blank `terms` fail with [`Error::MissingInput`] before
/// any work is done.
pub fn index_bytes(data: &[u8], terms: &str) -> Result<IndexOutcome> {
    index_bytes_with_options(data, terms, IndexOptions::default())
}

/// Index a PDF held in memory with custom options.
pub fn index_bytes_with_options(
    data: &[u8],
    terms: &str,
    options: IndexOptions,
) -> Result<IndexOutcome> {
    let terms = require_terms(terms)?;
    let parser = PdfParser::from_bytes_with_options(data, options)?;
    build_index(&parser, &terms, parser.options())
}

/// Index a PDF read from a reader.
pub fn index_reader<R: Read>(reader: R, terms: &str) -> Result<IndexOutcome> {
    index_reader_with_options(reader, terms, IndexOptions::default())
}

/// Index a PDF read from a reader with custom options.
pub fn index_reader_with_options<R: Read>(
    mut reader: R,
    terms: &str,
    options: IndexOptions,
) -> Result<IndexOutcome> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    index_bytes_with_options(&data, terms, options)
}

fn require_terms(raw: &str) -> Result<TermMap> {
    let terms = parse_terms(raw);
    if terms.is_empty() {
        return Err(Error::MissingInput(
            "no term specifications supplied".to_string(),
        ));
    }
    Ok(terms)
}
