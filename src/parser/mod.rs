//! PDF parsing: the positioned-text primitive the indexer consumes.

pub mod backend;
mod layout;
mod options;
mod pdf_parser;
mod source;

pub use layout::{LayoutAnalyzer, TextLine, TextSpan};
pub use options::{ErrorMode, IndexOptions, PageSelection, DEFAULT_HEADER_THRESHOLD};
pub use pdf_parser::PdfParser;
pub use source::PageSource;
