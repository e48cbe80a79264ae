//! PDF document parser using lopdf.

use std::io::Read;
use std::path::Path;

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::index::extract_body_text;
use crate::model::PageBlock;

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::layout::LayoutAnalyzer;
use super::options::IndexOptions;
use super::source::PageSource;

/// An opened PDF document, ready for block extraction.
pub struct PdfParser {
    backend: LopdfBackend,
    options: IndexOptions,
    /// Page ids in document order
    pages: Vec<PageId>,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, IndexOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: IndexOptions) -> Result<Self> {
        let path = path.as_ref();
        detect_format_from_path(path)?;
        let backend = LopdfBackend::load_file(path)?;
        Ok(Self::with_backend(backend, options))
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, IndexOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: IndexOptions) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::MissingInput("no document supplied".to_string()));
        }
        detect_format_from_bytes(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::with_backend(backend, options))
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, IndexOptions::default())
    }

    /// Parse a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: IndexOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    fn with_backend(backend: LopdfBackend, options: IndexOptions) -> Self {
        let pages = backend.pages().into_values().collect::<Vec<_>>();
        log::debug!(
            "opened PDF {} with {} pages",
            backend.version(),
            pages.len()
        );
        Self {
            backend,
            options,
            pages,
        }
    }

    /// Options this document was opened with.
    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.backend.version()
    }

    /// Body text of the page at a 0-based index, using the configured
    /// header threshold.
    pub fn body_text(&self, index: usize) -> Result<String> {
        let blocks = self.page_blocks(index)?;
        Ok(extract_body_text(&blocks, self.options.header_threshold))
    }
}

impl PageSource for PdfParser {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_blocks(&self, index: usize) -> Result<Vec<PageBlock>> {
        let page_id = self
            .pages
            .get(index)
            .ok_or(Error::PageOutOfRange(index as u32 + 1, self.pages.len() as u32))?;
        LayoutAnalyzer::new(&self.backend).page_blocks(*page_id)
    }
}
