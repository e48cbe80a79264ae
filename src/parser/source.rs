//! The page-level view of a document consumed by the indexer.

use crate::error::{Error, Result};
use crate::model::PageBlock;

/// A document as a sequence of pages, each reducible to positioned text
/// blocks.
///
/// [`PdfParser`](super::PdfParser) implements this for real PDFs; in-memory
/// page lists implement it for callers that already have blocks.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Text blocks of the page at a 0-based index, in reading order.
    fn page_blocks(&self, index: usize) -> Result<Vec<PageBlock>>;
}

impl PageSource for [Vec<PageBlock>] {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_blocks(&self, index: usize) -> Result<Vec<PageBlock>> {
        self.get(index)
            .cloned()
            .ok_or(Error::PageOutOfRange(index as u32 + 1, self.len() as u32))
    }
}

impl PageSource for Vec<Vec<PageBlock>> {
    fn page_count(&self) -> usize {
        self.as_slice().page_count()
    }

    fn page_blocks(&self, index: usize) -> Result<Vec<PageBlock>> {
        self.as_slice().page_blocks(index)
    }
}
