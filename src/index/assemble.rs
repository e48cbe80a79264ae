//! Index assembly: matching, range collapsing and label ordering.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::model::{Index, IndexEntry, IndexOutcome, MatchResult, TermMap};
use crate::parser::{ErrorMode, IndexOptions, PageSource};

use super::{collapse_ranges, extract_body_text, TermMatcher};

/// Build the index for a document.
///
/// Fails with [`Error::MissingInput`] when `terms` is empty. Returns
/// [`IndexOutcome::NoMatches`] when terms were supplied but none occurs in
/// the body text of any selected page.
pub fn build_index<S>(source: &S, terms: &TermMap, options: &IndexOptions) -> Result<IndexOutcome>
where
    S: PageSource + ?Sized,
{
    if terms.is_empty() {
        return Err(Error::MissingInput(
            "no term specifications supplied".to_string(),
        ));
    }

    let matcher = TermMatcher::new(terms)?.with_pages(options.pages.clone());
    let matches = matcher.run(source.page_count(), |index| page_body_text(source, index, options))?;

    Ok(assemble(matches))
}

/// Turn a [`MatchResult`] into an ordered index.
pub fn assemble(matches: MatchResult) -> IndexOutcome {
    if matches.is_empty() {
        return IndexOutcome::NoMatches;
    }

    let mut entries: Vec<IndexEntry> = matches
        .iter()
        .map(|(label, pages)| IndexEntry {
            label: label.to_string(),
            pages: pages.to_vec(),
            ranges: collapse_ranges(pages),
        })
        .collect();
    entries.sort_by(|a, b| compare_labels(&a.label, &b.label));

    IndexOutcome::Found(Index::new(entries, matches))
}

/// Case-insensitive label order, ties broken by plain string order.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn page_body_text<S>(source: &S, index: usize, options: &IndexOptions) -> Result<String>
where
    S: PageSource + ?Sized,
{
    match source.page_blocks(index) {
        Ok(blocks) => Ok(extract_body_text(&blocks, options.header_threshold)),
        Err(e) if options.error_mode == ErrorMode::Lenient => {
            log::warn!("skipping page {}: {}", index + 1, e);
            Ok(String::new())
        }
        Err(e) => Err(e),
    }
}
