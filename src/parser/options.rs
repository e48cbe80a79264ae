//! Indexing options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Default header band height in PDF points, measured from the top of
/// the page.
pub const DEFAULT_HEADER_THRESHOLD: f32 = 80.0;

/// Options for indexing a PDF document.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Blocks whose bottom edge lies above this line are treated as header
    pub header_threshold: f32,

    /// Error handling mode for per-page content
    pub error_mode: ErrorMode,

    /// Page selection (which pages to scan)
    pub pages: PageSelection,
}

impl IndexOptions {
    /// Create new index options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header threshold.
    pub fn with_header_threshold(mut self, threshold: f32) -> Self {
        self.header_threshold = threshold;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (pages with undecodable content count as empty).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            header_threshold: DEFAULT_HEADER_THRESHOLD,
            error_mode: ErrorMode::Strict,
            pages: PageSelection::All,
        }
    }
}

/// Error handling mode during page extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip pages whose content cannot be decoded and continue
    Lenient,
}

/// Page selection (1-indexed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive)
    Range(RangeInclusive<u32>),
    /// Specific pages
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10", "all").
    ///
    /// Collapsed index ranges such as `"1-3, 7, 9-10"` are accepted too.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let (start, end) = parse_bounds(start, end)?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = parse_bounds(start, end)?;
                pages.extend(start..=end);
            } else {
                pages.push(parse_page(part)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32> {
    let page: u32 = s
        .trim()
        .parse()
        .map_err(|_| Error::InvalidPageRange(format!("invalid page number {:?}", s.trim())))?;
    if page == 0 {
        return Err(Error::InvalidPageRange(
            "page numbers start at 1".to_string(),
        ));
    }
    Ok(page)
}

fn parse_bounds(start: &str, end: &str) -> Result<(u32, u32)> {
    let start = parse_page(start)?;
    let end = parse_page(end)?;
    if start > end {
        return Err(Error::InvalidPageRange(format!("{}-{}", start, end)));
    }
    Ok((start, end))
}
